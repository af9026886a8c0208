// Batch numbering and pipe-range allocation.
//
// Rules
// - A batch number is the first digit run of its label; labels without digits are ignored.
// - next = max(existing numbers for the work order) + 1. Gaps are never refilled.
// - The new range starts right after the pipe_to of the highest-numbered batch (0 when none).
// - Re-validation recomputes from fresh data and rejects a submission whose label or range start
//   no longer matches what was shown.

use crate::modules::registry::core::records::BatchRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

pub const BATCH_LABEL_PREFIX: &str = "Batch # ";

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid digit pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAllocation {
    pub batch_number: u32,
    pub batch: String,
    pub qty: u32,
    pub pipe_from: u32,
    pub pipe_to: u32,
}

impl std::fmt::Display for BatchAllocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (pipes {}-{})", self.batch, self.pipe_from, self.pipe_to)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("pipe range overflows after pipe {last_pipe_to}")]
    RangeOverflow { last_pipe_to: u32 },

    #[error("{shown} is no longer the next batch; it is now {current}. Please submit again")]
    StaleAllocation {
        shown: String,
        current: BatchAllocation,
    },
}

pub fn batch_number(label: &str) -> Option<u32> {
    DIGITS
        .find(label)
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
}

pub fn batch_label(number: u32) -> String {
    format!("{BATCH_LABEL_PREFIX}{number}")
}

pub fn allocate_next_batch(
    records: &[BatchRecord],
    client: &str,
    wo_no: &str,
    qty: u32,
) -> Result<BatchAllocation, AllocationError> {
    if qty == 0 {
        return Err(AllocationError::InvalidQuantity);
    }

    let numbered: Vec<(u32, &BatchRecord)> = records
        .iter()
        .filter(|record| record.belongs_to(client, wo_no))
        .filter_map(|record| batch_number(&record.batch).map(|n| (n, record)))
        .collect();

    let highest = numbered.iter().map(|(n, _)| *n).max().unwrap_or(0);
    let last_pipe_to = numbered
        .iter()
        .filter(|(n, _)| *n == highest)
        .map(|(_, record)| record.pipe_to_value())
        .max()
        .unwrap_or(0);

    let batch_number = highest
        .checked_add(1)
        .ok_or(AllocationError::RangeOverflow { last_pipe_to })?;
    let pipe_from = last_pipe_to
        .checked_add(1)
        .ok_or(AllocationError::RangeOverflow { last_pipe_to })?;
    let pipe_to = last_pipe_to
        .checked_add(qty)
        .ok_or(AllocationError::RangeOverflow { last_pipe_to })?;

    Ok(BatchAllocation {
        batch_number,
        batch: batch_label(batch_number),
        qty,
        pipe_from,
        pipe_to,
    })
}

pub fn revalidate_allocation(
    shown: &BatchAllocation,
    records: &[BatchRecord],
    client: &str,
    wo_no: &str,
) -> Result<BatchAllocation, AllocationError> {
    let current = allocate_next_batch(records, client, wo_no, shown.qty)?;
    if current.batch != shown.batch || current.pipe_from != shown.pipe_from {
        return Err(AllocationError::StaleAllocation {
            shown: shown.batch.clone(),
            current,
        });
    }
    Ok(current)
}

#[cfg(test)]
mod allocation_tests {
    use super::*;
    use crate::tests::fixtures::records::BatchRecordBuilder;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> Vec<BatchRecord> {
        vec![
            BatchRecordBuilder::new().batch("Batch # 1").pipe_range("1", "120").build(),
            BatchRecordBuilder::new().batch("Batch # 2").pipe_range("121", "240").build(),
            BatchRecordBuilder::new()
                .wo_no("200")
                .batch("Batch # 9")
                .pipe_range("1", "900")
                .build(),
        ]
    }

    #[rstest]
    fn it_should_allocate_the_next_batch_after_the_highest(before_each: Vec<BatchRecord>) {
        let allocation = allocate_next_batch(&before_each, "Acme", "100", 10).unwrap();
        assert_eq!(
            allocation,
            BatchAllocation {
                batch_number: 3,
                batch: "Batch # 3".into(),
                qty: 10,
                pipe_from: 241,
                pipe_to: 250,
            }
        );
    }

    #[rstest]
    #[case(&["Batch # 3", "Batch # 1", "Batch # 5"])]
    #[case(&["Batch # 5", "Batch # 3", "Batch # 1"])]
    #[case(&["Batch # 1", "Batch # 5", "Batch # 3"])]
    fn it_should_ignore_label_order(#[case] labels: &[&str]) {
        let records: Vec<BatchRecord> = labels
            .iter()
            .map(|label| BatchRecordBuilder::new().batch(*label).build())
            .collect();
        let allocation = allocate_next_batch(&records, "Acme", "100", 1).unwrap();
        assert_eq!(allocation.batch_number, 6);
    }

    #[rstest]
    fn it_should_not_fill_gaps_and_ignore_unnumbered_labels() {
        let records = vec![
            BatchRecordBuilder::new().batch("Batch # 4").pipe_range("301", "400").build(),
            BatchRecordBuilder::new().batch("Trial batch").pipe_range("1", "999").build(),
        ];
        let allocation = allocate_next_batch(&records, "Acme", "100", 50).unwrap();
        assert_eq!(allocation.batch, "Batch # 5");
        assert_eq!((allocation.pipe_from, allocation.pipe_to), (401, 450));
    }

    #[rstest]
    fn it_should_start_at_one_for_a_new_work_order(before_each: Vec<BatchRecord>) {
        let allocation = allocate_next_batch(&before_each, "Acme", "300", 25).unwrap();
        assert_eq!(allocation.batch, "Batch # 1");
        assert_eq!((allocation.pipe_from, allocation.pipe_to), (1, 25));
        assert_eq!(allocation.pipe_to, allocation.pipe_from + allocation.qty - 1);
    }

    #[rstest]
    fn it_should_reject_zero_quantity(before_each: Vec<BatchRecord>) {
        assert_eq!(
            allocate_next_batch(&before_each, "Acme", "100", 0),
            Err(AllocationError::InvalidQuantity)
        );
    }

    #[rstest]
    fn it_should_reject_a_stale_allocation(before_each: Vec<BatchRecord>) {
        let shown = allocate_next_batch(&before_each, "Acme", "100", 10).unwrap();
        assert_eq!(
            revalidate_allocation(&shown, &before_each, "Acme", "100"),
            Ok(shown.clone())
        );

        let mut moved_on = before_each.clone();
        moved_on.push(
            BatchRecordBuilder::new()
                .batch("Batch # 3")
                .pipe_range("241", "300")
                .build(),
        );
        match revalidate_allocation(&shown, &moved_on, "Acme", "100") {
            Err(AllocationError::StaleAllocation { shown, current }) => {
                assert_eq!(shown, "Batch # 3");
                assert_eq!(current.batch, "Batch # 4");
                assert_eq!((current.pipe_from, current.pipe_to), (301, 310));
            }
            other => panic!("expected stale allocation, got {other:?}"),
        }
    }

    #[rstest]
    fn it_should_extract_the_first_digit_run() {
        assert_eq!(batch_number("Batch # 12"), Some(12));
        assert_eq!(batch_number("B7-rework 2"), Some(7));
        assert_eq!(batch_number("none"), None);
    }

    #[rstest]
    fn it_should_describe_the_corrected_allocation(before_each: Vec<BatchRecord>) {
        let current = allocate_next_batch(&before_each, "Acme", "100", 10).unwrap();
        let error = AllocationError::StaleAllocation {
            shown: "Batch # 2".into(),
            current,
        };
        assert_eq!(
            error.to_string(),
            "Batch # 2 is no longer the next batch; it is now Batch # 3 (pipes 241-250). Please submit again"
        );
    }
}
