/// Whether `listing` (in `ps aux` layout) shows a process whose line contains `needle`.
///
/// Lines mentioning `grep` are ignored, and so is the line for `own_pid` (second column), so
/// neither a shell filter nor this job itself can count as the agent.
pub fn agent_present(listing: &str, needle: &str, own_pid: u32) -> bool {
    listing
        .lines()
        .filter(|line| line.contains(needle))
        .filter(|line| !line.contains("grep"))
        .any(|line| pid_column(line) != Some(own_pid))
}

fn pid_column(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::agent_present;

    const HEADER: &str = "USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND";

    #[test]
    fn finds_running_agent() {
        let listing = format!(
            "{HEADER}\nfoundat+  812  0.1  0.4 123 456 ? Ssl Jan20 1:02 /usr/lib/foundationdb/backup_agent/backup_agent -C /etc/foundationdb/fdb.cluster\n"
        );
        assert!(agent_present(&listing, "backup_agent", 4242));
    }

    #[test]
    fn listing_without_agent() {
        let listing = format!("{HEADER}\nroot 1 0.0 0.1 1 1 ? Ss Jan20 0:05 /sbin/init\n");
        assert!(!agent_present(&listing, "backup_agent", 4242));
        assert!(!agent_present("", "backup_agent", 4242));
    }

    #[test]
    fn grep_lines_do_not_count() {
        let listing = format!("{HEADER}\nroot 999 0.0 0.0 1 1 pts/0 S+ 10:00 0:00 grep backup_agent\n");
        assert!(!agent_present(&listing, "backup_agent", 4242));
    }

    #[test]
    fn own_process_does_not_count() {
        let listing = format!("{HEADER}\nroot 4242 0.0 0.0 1 1 ? S 10:00 0:00 fdbvault --agent backup_agent\n");
        assert!(!agent_present(&listing, "backup_agent", 4242));
        assert!(agent_present(&listing, "backup_agent", 1));
    }
}
