//! Property-based invariant tests for field masks.
//!
//! 1. Every mask is idempotent on arbitrary input.
//! 2. Every mask is idempotent on every prefix of a digit string (one call
//!    per keystroke).
//! 3. Masks are deterministic: prior calls do not influence the output.
//! 4. Non-plain masks only ever emit digits plus their own separators.
//! 5. Currency normalization re-masks to the same display value.

use proptest::prelude::*;
use recform_mask::MaskKind;

fn all_kinds() -> Vec<MaskKind> {
    vec![
        MaskKind::Plain,
        MaskKind::digits(3),
        MaskKind::digits(16),
        MaskKind::unbounded_digits(),
        MaskKind::CPF,
        MaskKind::CEP,
        MaskKind::Phone,
        MaskKind::BRL,
        MaskKind::DayMonth,
    ]
}

fn kind_strategy() -> impl Strategy<Value = MaskKind> {
    prop::sample::select(all_kinds())
}

// ── 1. Idempotence on arbitrary input ───────────────────────────────────

proptest! {
    #[test]
    fn mask_is_idempotent(kind in kind_strategy(), raw in ".{0,40}") {
        let once = kind.apply(&raw);
        prop_assert_eq!(kind.apply(&once), once.clone(), "kind={:?} raw={:?}", kind, raw);
    }
}

// ── 2. Idempotence at every keystroke ───────────────────────────────────

proptest! {
    #[test]
    fn mask_is_idempotent_for_every_prefix(kind in kind_strategy(), digits in "[0-9]{0,20}") {
        for end in 0..=digits.len() {
            let prefix = &digits[..end];
            let once = kind.apply(prefix);
            prop_assert_eq!(kind.apply(&once), once.clone(), "kind={:?} prefix={:?}", kind, prefix);
        }
    }
}

// ── 3. Determinism ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn mask_is_deterministic(kind in kind_strategy(), a in ".{0,20}", b in ".{0,20}") {
        let first = kind.apply(&a);
        let _ = kind.apply(&b);
        prop_assert_eq!(kind.apply(&a), first);
    }
}

// ── 4. Output alphabet ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn masked_output_alphabet(raw in ".{0,40}") {
        for kind in [MaskKind::CPF, MaskKind::CEP, MaskKind::DayMonth, MaskKind::digits(16)] {
            let out = kind.apply(&raw);
            prop_assert!(
                out.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/')),
                "kind={:?} out={:?}", kind, out
            );
        }
        let phone = MaskKind::Phone.apply(&raw);
        prop_assert!(phone.chars().all(|c| c.is_ascii_digit() || "() -".contains(c)));
    }
}

// ── 5. Currency normalization ───────────────────────────────────────────

proptest! {
    #[test]
    fn currency_normalization_round_trips(digits in "[0-9]{1,18}") {
        let display = MaskKind::BRL.apply(&digits);
        let stored = MaskKind::BRL.normalize(&display);
        prop_assert_eq!(MaskKind::BRL.apply(&stored), display);
        prop_assert!(stored.contains('.'));
    }
}
