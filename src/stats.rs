//! Probe-length and occupancy statistics.
//!
//! Compiled for tests, and for library users with the `stats` feature.

use alloc::vec::Vec;
use core::hash::BuildHasher;

use crate::Table;
use crate::layout::State;
use crate::probe::probe_distance;

/// Histogram of probe distances: `counts[d]` is the number of live entries
/// sitting `d` slots past their home slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Entry counts indexed by probe distance. Trailing zero bins are trimmed.
    pub counts: Vec<usize>,
}

impl ProbeHistogram {
    /// Total number of entries counted.
    pub fn entries(&self) -> usize {
        self.counts.iter().sum()
    }

    /// The longest probe distance of any entry, or `None` if there are none.
    pub fn max_distance(&self) -> Option<usize> {
        self.counts.iter().rposition(|&c| c != 0)
    }

    /// Mean probe distance over all entries.
    pub fn mean_distance(&self) -> f64 {
        let entries = self.entries();
        if entries == 0 {
            return 0.0;
        }
        let weighted: usize = self.counts.iter().enumerate().map(|(d, &c)| d * c).sum();
        weighted as f64 / entries as f64
    }

    /// Pretty-prints the histogram as a horizontal bar chart.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.entries());

        let make_bar = |count: usize| -> std::string::String {
            if count == 0 {
                return std::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            match units % 8 {
                0 => {}
                1 => bar.push('▏'),
                2 => bar.push('▎'),
                3 => bar.push('▍'),
                4 => bar.push('▌'),
                5 => bar.push('▋'),
                6 => bar.push('▊'),
                _ => bar.push('▉'),
            }
            bar
        };

        for (distance, &count) in self.counts.iter().enumerate() {
            println!("{:>4} | {} ({})", distance, make_bar(count), count);
        }
    }
}

/// Occupancy and memory statistics for a table.
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of Filled slots.
    pub size: usize,
    /// Number of Deleted slots.
    pub tombstones: usize,
    /// Total number of slots.
    pub capacity: usize,
    /// `size + tombstones` the table tolerates before the next insert rehashes.
    pub max_load: usize,
    /// `size / capacity`.
    pub load_factor: f64,
    /// `(size + tombstones) / capacity`, the figure the growth policy checks.
    pub occupancy: f64,
    /// Bytes held by the four columns.
    pub total_bytes: usize,
    /// Bytes held by slots that are not Filled.
    pub wasted_bytes: usize,
}

impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.size,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Tombstones: {} ({:.2}% occupancy, rehash above {})",
            self.tombstones,
            self.occupancy * 100.0,
            self.max_load
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

impl<'k, S: BuildHasher> Table<'k, S> {
    /// Computes the probe-distance histogram of the live entries.
    ///
    /// The distance of an entry is how many slots past `hash & (capacity - 1)`
    /// it sits, following wraparound.
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let columns = &self.columns;
        let mask = columns.mask();
        let mut counts = Vec::new();

        for (index, state) in columns.states.iter().enumerate() {
            if *state != State::Filled {
                continue;
            }
            let distance = probe_distance(columns.hashes[index], index, mask);
            if counts.len() <= distance {
                counts.resize(distance + 1, 0);
            }
            counts[distance] += 1;
        }

        ProbeHistogram { counts }
    }

    /// Returns occupancy and memory statistics for debugging.
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        let total_bytes = self.columns.allocated_bytes();
        let slot_bytes = if capacity == 0 { 0 } else { total_bytes / capacity };

        DebugStats {
            size: self.size,
            tombstones: self.tombstones,
            capacity,
            max_load: crate::grow::max_load(capacity),
            load_factor: self.size as f64 / capacity as f64,
            occupancy: (self.size + self.tombstones) as f64 / capacity as f64,
            total_bytes,
            wasted_bytes: (capacity - self.size) * slot_bytes,
        }
    }
}
