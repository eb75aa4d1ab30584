//! Property-based tests for schema validation and storage conversion.
//!
//! 1. A blank required field always yields an error for that field.
//! 2. Validation never mutates the record.
//! 3. Decoding an encoded draft yields the draft back.

use proptest::prelude::*;
use recform_core::{FieldDescriptor, FormSchema, MaskKind};

fn schema() -> FormSchema {
    FormSchema::builder("plano", "Plano")
        .field(
            FieldDescriptor::new("valorPlano", "Valor do Plano")
                .mask(MaskKind::BRL)
                .required("Valor do plano é obrigatório")
                .normalize_on_submit(),
        )
        .field(
            FieldDescriptor::new("dataExpiracao", "Data de Expiração")
                .mask(MaskKind::DayMonth)
                .required("Data de expiração é obrigatória"),
        )
        .field(
            FieldDescriptor::new("numeroContrato", "Número do Contrato")
                .mask(MaskKind::unbounded_digits())
                .required("Número do contrato é obrigatório"),
        )
        .build()
        .unwrap()
}

const FIELDS: [&str; 3] = ["valorPlano", "dataExpiracao", "numeroContrato"];

// ── 1. Validation completeness ──────────────────────────────────────────

proptest! {
    #[test]
    fn blank_required_field_is_reported(
        blank in 0usize..3,
        whitespace in "[ \t]{0,3}",
        filler in "[0-9]{1,8}",
    ) {
        let schema = schema();
        let mut draft = schema.default_record();
        for (idx, name) in FIELDS.iter().enumerate() {
            let value = if idx == blank {
                whitespace.clone()
            } else {
                schema.mask_field(name, &filler).unwrap()
            };
            draft.set(name, value);
        }
        let report = schema.validate(&draft);
        prop_assert!(!report.is_valid());
        prop_assert!(report.error(FIELDS[blank]).is_some());
    }
}

// ── 2. Validation is read-only ──────────────────────────────────────────

proptest! {
    #[test]
    fn validation_is_read_only(values in prop::collection::vec(".{0,12}", 3)) {
        let schema = schema();
        let mut draft = schema.default_record();
        for (name, value) in FIELDS.iter().zip(&values) {
            draft.set(name, value.clone());
        }
        let before = draft.clone();
        let _ = schema.validate(&draft);
        prop_assert_eq!(draft, before);
    }
}

// ── 3. Storage round-trip ───────────────────────────────────────────────

proptest! {
    #[test]
    fn decode_inverts_encode(raw in prop::collection::vec("[0-9a-z ]{0,18}", 3)) {
        let schema = schema();
        let mut draft = schema.default_record();
        for (name, value) in FIELDS.iter().zip(&raw) {
            draft.set(name, schema.mask_field(name, value).unwrap());
        }
        let json = schema.encode(&draft).unwrap();
        prop_assert_eq!(schema.decode(&json).unwrap(), draft);
    }
}
