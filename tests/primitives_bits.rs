//! Bit decomposition and comparison gadget tests.
//!
//! Exercises the gadgets directly against a test constraint system, without
//! wrapping them in a full circuit.

use ff::Field;
use nova_snark::frontend::{
    gadgets::num::AllocatedNum, util_cs::test_cs::TestConstraintSystem, ConstraintSystem,
};
use zkvote_gadgets::circuit::gadgets::{
    assert_less_than, from_bits, in_range, is_equal, is_one_of, is_zero, less_than, one_of_n,
    strict_range, to_bits,
};
use zkvote_gadgets::{FieldElement, GadgetError};

mod common;
use common::f;

fn alloc(cs: &mut TestConstraintSystem<FieldElement>, name: &str, v: FieldElement) -> AllocatedNum<FieldElement> {
    AllocatedNum::alloc(cs.namespace(|| name.to_string()), || Ok(v)).unwrap()
}

#[test]
fn test_to_bits_round_trip_small_widths() {
    for width in 1..=4usize {
        for x in 0..(1u64 << width) {
            let mut cs = TestConstraintSystem::<FieldElement>::new();
            let num = alloc(&mut cs, "x", f(x));
            let bits = to_bits(cs.namespace(|| "bits"), &num, width).unwrap();
            let back = from_bits(cs.namespace(|| "back"), &bits).unwrap();

            assert!(cs.is_satisfied(), "x = {} at width {} should decompose", x, width);
            assert_eq!(bits.width(), width);
            assert_eq!(back.get_value(), Some(f(x)));

            let values = bits.get_values().unwrap();
            for (i, b) in values.iter().enumerate() {
                assert_eq!(*b, (x >> i) & 1 == 1, "bit {} of {}", i, x);
            }
        }
    }
    println!("✓ to_bits / from_bits round trip for every value below 2^4");
}

#[test]
fn test_to_bits_rejects_value_at_bound() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let num = alloc(&mut cs, "x", f(16));
    to_bits(cs.namespace(|| "bits"), &num, 4).unwrap();
    assert!(!cs.is_satisfied());
    assert_eq!(cs.which_is_unsatisfied(), Some("bits/recompose"));
}

#[test]
fn test_strict_range_rejects_large_values() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let num = alloc(&mut cs, "x", -FieldElement::ONE);
    strict_range(cs.namespace(|| "range"), &num, 8).unwrap();
    assert!(!cs.is_satisfied(), "p - 1 must not fit in 8 bits");

    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let num = alloc(&mut cs, "x", f(255));
    strict_range(cs.namespace(|| "range"), &num, 8).unwrap();
    assert!(cs.is_satisfied());
}

#[test]
fn test_zero_width_is_refused() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let num = alloc(&mut cs, "x", f(0));
    assert!(matches!(
        to_bits(cs.namespace(|| "bits"), &num, 0).map_err(GadgetError::from),
        Err(GadgetError::Configuration(_))
    ));
}

#[test]
fn test_is_zero_and_is_equal() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let zero = alloc(&mut cs, "zero", f(0));
    let seven = alloc(&mut cs, "seven", f(7));
    let other_seven = alloc(&mut cs, "other_seven", f(7));

    let z = is_zero(cs.namespace(|| "zero_is_zero"), &zero).unwrap();
    let nz = is_zero(cs.namespace(|| "seven_is_zero"), &seven).unwrap();
    let eq = is_equal(cs.namespace(|| "sevens_equal"), &seven, &other_seven).unwrap();
    let ne = is_equal(cs.namespace(|| "seven_equals_zero"), &seven, &zero).unwrap();

    assert!(cs.is_satisfied());
    assert_eq!(z.get_value(), Some(FieldElement::ONE));
    assert_eq!(nz.get_value(), Some(FieldElement::ZERO));
    assert_eq!(eq.get_value(), Some(FieldElement::ONE));
    assert_eq!(ne.get_value(), Some(FieldElement::ZERO));
}

#[test]
fn test_less_than_table() {
    for a in 0..8u64 {
        for b in 0..8u64 {
            let mut cs = TestConstraintSystem::<FieldElement>::new();
            let x = alloc(&mut cs, "a", f(a));
            let y = alloc(&mut cs, "b", f(b));
            let lt = less_than(cs.namespace(|| "lt"), &x, &y, 3).unwrap();
            assert!(cs.is_satisfied());
            let expected = if a < b { FieldElement::ONE } else { FieldElement::ZERO };
            assert_eq!(lt.get_value(), Some(expected), "{} < {}", a, b);
        }
    }
}

#[test]
fn test_assert_less_than_names_failing_constraint() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let x = alloc(&mut cs, "a", f(5));
    let y = alloc(&mut cs, "b", f(5));
    assert_less_than(cs.namespace(|| "check"), &x, &y, 3).unwrap();
    assert!(!cs.is_satisfied());
    assert_eq!(
        cs.which_is_unsatisfied(),
        Some("check/less_than_holds/is_constant")
    );
}

#[test]
fn test_in_range_is_inclusive() {
    for (x, inside) in [(2u64, false), (3, true), (5, true), (7, true), (8, false)] {
        let mut cs = TestConstraintSystem::<FieldElement>::new();
        let v = alloc(&mut cs, "x", f(x));
        let lo = alloc(&mut cs, "lo", f(3));
        let hi = alloc(&mut cs, "hi", f(7));
        let r = in_range(cs.namespace(|| "range"), &v, &lo, &hi, 4).unwrap();
        assert!(cs.is_satisfied());
        let expected = if inside { FieldElement::ONE } else { FieldElement::ZERO };
        assert_eq!(r.get_value(), Some(expected), "{} in [3, 7]", x);
    }
}

#[test]
fn test_one_of_n_indicator() {
    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let v = alloc(&mut cs, "v", f(2));
    let ind = one_of_n(cs.namespace(|| "ind"), &v, 4).unwrap();
    assert!(cs.is_satisfied());
    let values: Vec<_> = ind.iter().map(|i| i.get_value().unwrap()).collect();
    assert_eq!(values, vec![f(0), f(0), f(1), f(0)]);

    let mut cs = TestConstraintSystem::<FieldElement>::new();
    let v = alloc(&mut cs, "v", f(4));
    one_of_n(cs.namespace(|| "ind"), &v, 4).unwrap();
    assert_eq!(cs.which_is_unsatisfied(), Some("ind/exactly_one"));
}

#[test]
fn test_is_one_of_set_membership() {
    let set = [f(3), f(11), f(42)];
    for (value, member) in [(11u64, true), (42, true), (4, false)] {
        let mut cs = TestConstraintSystem::<FieldElement>::new();
        let v = alloc(&mut cs, "v", f(value));
        let out = is_one_of(cs.namespace(|| "member"), &v, &set).unwrap();
        assert!(cs.is_satisfied());
        let expected = if member { FieldElement::ONE } else { FieldElement::ZERO };
        assert_eq!(out.get_value(), Some(expected), "{} in set", value);
    }
}
