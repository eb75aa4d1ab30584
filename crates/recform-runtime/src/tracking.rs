#![forbid(unsafe_code)]

//! Per-field touched and dirty tracking.

use recform_core::{FormSchema, Record};

/// Touched flags and the persisted baseline for one draft.
///
/// Indices are descriptor positions in the schema.
#[derive(Debug, Clone)]
pub(crate) struct EditTracking {
    /// Per-field touched state (set on first change or on a submit attempt).
    touched: Vec<bool>,
    /// Last persisted copy; the default record when nothing is stored.
    baseline: Record,
}

impl EditTracking {
    pub(crate) fn new(schema: &FormSchema) -> Self {
        Self {
            touched: vec![false; schema.fields().len()],
            baseline: schema.default_record(),
        }
    }

    /// Capture `record` as the persisted baseline and clear touched state.
    pub(crate) fn reset(&mut self, record: &Record) {
        self.baseline = record.clone();
        self.touched.iter_mut().for_each(|t| *t = false);
    }

    pub(crate) fn mark_touched(&mut self, idx: usize) {
        if let Some(flag) = self.touched.get_mut(idx) {
            *flag = true;
        }
    }

    pub(crate) fn touch_all(&mut self) {
        self.touched.iter_mut().for_each(|t| *t = true);
    }

    pub(crate) fn is_touched(&self, idx: usize) -> bool {
        self.touched.get(idx).copied().unwrap_or(false)
    }

    pub(crate) fn is_dirty(&self, draft: &Record, field: &str) -> bool {
        draft.get(field) != self.baseline.get(field)
    }

    pub(crate) fn any_dirty(&self, draft: &Record) -> bool {
        draft != &self.baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recform_core::FieldDescriptor;

    fn schema() -> FormSchema {
        FormSchema::builder("perfil", "Perfil")
            .field(FieldDescriptor::new("nome", "Nome"))
            .field(FieldDescriptor::new("idade", "Idade"))
            .build()
            .unwrap()
    }

    #[test]
    fn touched_flags() {
        let schema = schema();
        let mut tracking = EditTracking::new(&schema);
        assert!(!tracking.is_touched(0));
        tracking.mark_touched(1);
        assert!(tracking.is_touched(1));
        assert!(!tracking.is_touched(0));
        tracking.mark_touched(9);
        assert!(!tracking.is_touched(9));
        tracking.touch_all();
        assert!(tracking.is_touched(0));
        tracking.reset(&schema.default_record());
        assert!(!tracking.is_touched(0));
        assert!(!tracking.is_touched(1));
    }

    #[test]
    fn dirty_compares_against_baseline() {
        let schema = schema();
        let mut tracking = EditTracking::new(&schema);
        let mut draft = schema.default_record();
        assert!(!tracking.any_dirty(&draft));

        draft.set("nome", "Ana");
        assert!(tracking.is_dirty(&draft, "nome"));
        assert!(!tracking.is_dirty(&draft, "idade"));

        tracking.reset(&draft);
        assert!(!tracking.any_dirty(&draft));
    }
}
