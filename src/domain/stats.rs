use std::collections::HashMap;

/// Per-interface network counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceIo {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl InterfaceIo {
    pub fn new(rx_bytes: u64, tx_bytes: u64) -> Self {
        Self { rx_bytes, tx_bytes }
    }
}

/// One-shot resource sample for a single container.
///
/// Every field is optional: runtimes omit counters for stopped containers or
/// unsupported cgroup controllers, and the display layer degrades per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSnapshot {
    pub cpu_percent: Option<f64>,
    pub cpu_nanos: Option<u64>,
    pub mem_usage: Option<u64>,
    pub mem_limit: Option<u64>,
    pub networks: Option<HashMap<String, InterfaceIo>>,
    pub block_input: Option<u64>,
    pub block_output: Option<u64>,
}

impl StatsSnapshot {
    /// Totals across every interface, `(rx, tx)`.
    pub fn network_totals(&self) -> (u64, u64) {
        self.networks
            .iter()
            .flat_map(|networks| networks.values())
            .fold((0u64, 0u64), |(rx, tx), io| {
                (rx.saturating_add(io.rx_bytes), tx.saturating_add(io.tx_bytes))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_totals_sum_all_interfaces() {
        let mut networks = HashMap::new();
        networks.insert("eth0".to_string(), InterfaceIo::new(100, 10));
        networks.insert("eth1".to_string(), InterfaceIo::new(24, 5));
        let snapshot = StatsSnapshot {
            networks: Some(networks),
            ..Default::default()
        };

        assert_eq!(snapshot.network_totals(), (124, 15));
    }

    #[test]
    fn test_network_totals_without_mapping() {
        assert_eq!(StatsSnapshot::default().network_totals(), (0, 0));
    }
}
