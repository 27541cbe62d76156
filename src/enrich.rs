use crate::history::HistoryTable;

/// History table plus one derived percent-change series per raw column.
///
/// `pct[row][col]` aligns with `table.columns`. Row 0 and any non-finite
/// result (previous value 0, NaN) are filled with 0.0; the first-run path
/// depends on that fill, so it is not distinguishable from a true 0% change.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    pub table: HistoryTable,
    pub pct: Vec<Vec<f64>>,
}

/// Derive percent-change columns from the sorted history table.
///
/// Pure and deterministic: the same input always yields the same output.
pub fn enrich_with_changes(table: &HistoryTable) -> EnrichedTable {
    let mut pct = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let mut row_pct = Vec::with_capacity(row.values.len());
        for (col, &value) in row.values.iter().enumerate() {
            let change = if i == 0 {
                0.0
            } else {
                let prev = table.rows[i - 1].values.get(col).copied().unwrap_or(0.0);
                let raw = 100.0 * (value - prev) / prev;
                if raw.is_finite() {
                    raw
                } else {
                    0.0
                }
            };
            row_pct.push(change);
        }
        pct.push(row_pct);
    }

    EnrichedTable {
        table: table.clone(),
        pct,
    }
}

impl EnrichedTable {
    /// Row-wise mean over all percent-change columns, zero-filled. Feeds the
    /// secondary-axis bar series.
    pub fn mean_pct_per_row(&self) -> Vec<f64> {
        self.pct
            .iter()
            .map(|row| {
                if row.is_empty() {
                    0.0
                } else {
                    row.iter().sum::<f64>() / row.len() as f64
                }
            })
            .collect()
    }

    pub fn latest_price(&self, col: usize) -> Option<f64> {
        self.table.rows.last().and_then(|row| row.values.get(col)).copied()
    }

    pub fn latest_pct(&self, col: usize) -> Option<f64> {
        self.pct.last().and_then(|row| row.get(col)).copied()
    }
}
