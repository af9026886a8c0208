// Builders for use case commands.

use crate::modules::registry::core::allocation::{BatchAllocation, batch_number};
use crate::modules::registry::core::stages::{Classification, Stage, StageScraps};
use crate::modules::registry::use_cases::record_inspection::command::RecordInspection;
use crate::modules::registry::use_cases::register_batch::command::RegisterBatch;

pub struct RegisterBatchBuilder {
    inner: RegisterBatch,
}

impl Default for RegisterBatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RegisterBatchBuilder {
    pub fn new() -> Self {
        Self {
            inner: RegisterBatch {
                client: "Acme".into(),
                wo_no: "100".into(),
                shown: BatchAllocation {
                    batch_number: 1,
                    batch: "Batch # 1".into(),
                    qty: 100,
                    pipe_from: 1,
                    pipe_to: 100,
                },
                diameter: "2 7/8".into(),
                rack: "R1".into(),
                arrival_date: "2024-03-05".into(),
                session_id: None,
            },
        }
    }

    pub fn client(mut self, v: impl Into<String>) -> Self {
        self.inner.client = v.into();
        self
    }

    pub fn wo_no(mut self, v: impl Into<String>) -> Self {
        self.inner.wo_no = v.into();
        self
    }

    pub fn shown(mut self, label: &str, pipe_from: u32, qty: u32) -> Self {
        self.inner.shown = BatchAllocation {
            batch_number: batch_number(label).unwrap_or(0),
            batch: label.to_string(),
            qty,
            pipe_from,
            pipe_to: pipe_from.saturating_add(qty).saturating_sub(1),
        };
        self
    }

    pub fn session_id(mut self, v: impl Into<String>) -> Self {
        self.inner.session_id = Some(v.into());
        self
    }

    pub fn diameter(mut self, v: impl Into<String>) -> Self {
        self.inner.diameter = v.into();
        self
    }

    pub fn rack(mut self, v: impl Into<String>) -> Self {
        self.inner.rack = v.into();
        self
    }

    pub fn arrival_date(mut self, v: impl Into<String>) -> Self {
        self.inner.arrival_date = v.into();
        self
    }

    pub fn build(self) -> RegisterBatch {
        self.inner
    }
}

pub struct RecordInspectionBuilder {
    inner: RecordInspection,
}

impl Default for RecordInspectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RecordInspectionBuilder {
    pub fn new() -> Self {
        Self {
            inner: RecordInspection {
                client: "Acme".into(),
                wo_no: "100".into(),
                batch: "Batch # 1".into(),
                start_date: String::new(),
                end_date: String::new(),
                scraps: StageScraps::new(),
                classification: Classification {
                    class_1: 100,
                    ..Classification::default()
                },
            },
        }
    }

    pub fn client(mut self, v: impl Into<String>) -> Self {
        self.inner.client = v.into();
        self
    }

    pub fn wo_no(mut self, v: impl Into<String>) -> Self {
        self.inner.wo_no = v.into();
        self
    }

    pub fn batch(mut self, v: impl Into<String>) -> Self {
        self.inner.batch = v.into();
        self
    }

    pub fn scrap(mut self, stage: Stage, scrap: u32) -> Self {
        self.inner.scraps.set(stage, scrap);
        self
    }

    pub fn classes(mut self, class_1: u32, class_2: u32, class_3: u32, repair: u32) -> Self {
        self.inner.classification = Classification {
            class_1,
            class_2,
            class_3,
            repair,
        };
        self
    }

    pub fn dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.inner.start_date = start.into();
        self.inner.end_date = end.into();
        self
    }

    pub fn build(self) -> RecordInspection {
        self.inner
    }
}
