//! Canonical text round-trip: printing a parsed formula and parsing the
//! result again yields the same tree.

use livesheet_core::{CellError, CellValue, Position, MAX_COLS, MAX_ROWS};
use livesheet_formula::{
    parse_formula, BinaryOperator, Formula, FormulaExpr, FormulaValue, UnaryOperator,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_number() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => (0u32..10_000).prop_map(f64::from),
        2 => 0.0f64..1e6,
        1 => 1e-9f64..1e-3,
        1 => 1e15f64..1e300,
    ]
}

fn arb_position() -> impl Strategy<Value = Position> {
    (0..MAX_ROWS, 0..MAX_COLS).prop_map(|(row, col)| Position::new(row, col))
}

fn arb_error() -> impl Strategy<Value = CellError> {
    prop_oneof![
        Just(CellError::Ref),
        Just(CellError::Value),
        Just(CellError::Div0),
    ]
}

fn arb_binary_op() -> impl Strategy<Value = BinaryOperator> {
    prop_oneof![
        Just(BinaryOperator::Add),
        Just(BinaryOperator::Subtract),
        Just(BinaryOperator::Multiply),
        Just(BinaryOperator::Divide),
    ]
}

fn arb_unary_op() -> impl Strategy<Value = UnaryOperator> {
    prop_oneof![Just(UnaryOperator::Plus), Just(UnaryOperator::Negate)]
}

fn arb_expr() -> impl Strategy<Value = FormulaExpr> {
    let leaf = prop_oneof![
        3 => arb_number().prop_map(FormulaExpr::Number),
        3 => arb_position().prop_map(FormulaExpr::CellRef),
        1 => arb_error().prop_map(FormulaExpr::Error),
    ];

    leaf.prop_recursive(6, 64, 2, |inner| {
        prop_oneof![
            3 => (arb_binary_op(), inner.clone(), inner.clone())
                .prop_map(|(op, l, r)| FormulaExpr::binary(op, l, r)),
            1 => (arb_unary_op(), inner).prop_map(|(op, e)| FormulaExpr::unary(op, e)),
        ]
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn printed_expression_parses_back(expr in arb_expr()) {
        let text = expr.to_string();
        let reparsed = parse_formula(&text);
        prop_assert_eq!(reparsed, Ok(expr), "text: {}", text);
    }

    #[test]
    fn canonical_text_is_a_fixed_point(expr in arb_expr()) {
        let once = Formula::from_ast(expr).expression();
        let twice = Formula::parse(&once).map(|f| f.expression());
        prop_assert_eq!(twice, Ok(once));
    }

    #[test]
    fn reparsed_formula_evaluates_the_same(expr in arb_expr()) {
        let lookup = |pos: Position| Some(CellValue::Number(f64::from(pos.row % 7) - 3.0));
        let formula = Formula::from_ast(expr);
        let reparsed = Formula::parse(&formula.expression()).unwrap();
        prop_assert_eq!(reparsed.evaluate(&lookup), formula.evaluate(&lookup));
        prop_assert_eq!(reparsed.referenced_cells(), formula.referenced_cells());
    }
}

// ---------------------------------------------------------------------------
// Examples
// ---------------------------------------------------------------------------

#[test]
fn test_canonical_examples() {
    let cases = [
        ("1 + 2", "1+2"),
        ("(1 + 2) + 3", "1+2+3"),
        ("1 + (2 + 3)", "1+(2+3)"),
        ("(A1 * B1) + C1", "A1*B1+C1"),
        ("A1 * (B1 + C1)", "A1*(B1+C1)"),
        ("-(A1)", "-A1"),
        ("-(A1 / 2)", "-(A1/2)"),
        ("2.50", "2.5"),
        ("1e3", "1000"),
        ("#div/0!", "#DIV/0!"),
    ];

    for (input, expected) in cases {
        let formula = Formula::parse(input).unwrap();
        assert_eq!(formula.expression(), expected, "input: {}", input);
    }
}

#[test]
fn test_evaluation_examples() {
    let lookup = |pos: Position| match pos.to_a1_string().as_str() {
        "A1" => Some(CellValue::Number(6.0)),
        "B1" => Some(CellValue::string("2")),
        "C1" => Some(CellValue::string("two")),
        _ => None,
    };

    let eval = |text: &str| Formula::parse(text).unwrap().evaluate(&lookup);

    assert_eq!(eval("A1/B1"), FormulaValue::Number(3.0));
    assert_eq!(eval("A1+Z9"), FormulaValue::Number(6.0));
    assert_eq!(eval("A1*C1"), FormulaValue::Error(CellError::Value));
    assert_eq!(eval("A1/(B1-2)"), FormulaValue::Error(CellError::Div0));
    assert_eq!(eval("A1+ZZZZ1"), FormulaValue::Error(CellError::Ref));
}
