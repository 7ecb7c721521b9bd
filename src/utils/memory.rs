// process working-set observation behind an injectable probe

/// reports the process resident set size in mebibytes
///
/// the pipeline only ever talks to this trait, so upload logic can be
/// exercised in tests without reading live process statistics
pub trait WorkingSetProbe: Send + Sync {
    fn resident_set_mib(&self) -> Option<u64>;
}

/// live probe backed by /proc/self/status on linux
///
/// returns None on platforms without procfs
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessWorkingSet;

impl WorkingSetProbe for ProcessWorkingSet {
    #[cfg(target_os = "linux")]
    fn resident_set_mib(&self) -> Option<u64> {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_vm_rss_kib(&status).map(|kib| kib / 1024)
    }

    #[cfg(not(target_os = "linux"))]
    fn resident_set_mib(&self) -> Option<u64> {
        None
    }
}

/// fixed probe for tests
#[derive(Debug, Clone, Copy)]
pub struct StaticWorkingSet(pub Option<u64>);

impl WorkingSetProbe for StaticWorkingSet {
    fn resident_set_mib(&self) -> Option<u64> {
        self.0
    }
}

/// pull the VmRSS figure (reported in kB) out of /proc/self/status content
#[allow(dead_code)] // unused on non-procfs platforms
fn parse_vm_rss_kib(status: &str) -> Option<u64> {
    status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vm_rss_from_proc_status() {
        let status = "Name:\tupsink\nVmPeak:\t   12000 kB\nVmRSS:\t    8192 kB\nThreads:\t8\n";
        assert_eq!(parse_vm_rss_kib(status), Some(8192));
    }

    #[test]
    fn missing_vm_rss_yields_none() {
        assert_eq!(parse_vm_rss_kib("Name:\tupsink\nThreads:\t8\n"), None);
        assert_eq!(parse_vm_rss_kib(""), None);
    }

    #[test]
    fn malformed_figures_yield_none() {
        assert_eq!(parse_vm_rss_kib("VmRSS:\tlots kB\n"), None);
    }

    #[test]
    fn static_probe_reports_the_fixed_figure() {
        assert_eq!(StaticWorkingSet(Some(42)).resident_set_mib(), Some(42));
        assert_eq!(StaticWorkingSet(None).resident_set_mib(), None);
    }
}
