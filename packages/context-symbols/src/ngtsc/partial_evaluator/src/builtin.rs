// Builtin Operators
//
// Constant folding for the operators metadata commonly uses.

use super::result::MetadataValue;
use ts::{BinaryOperator, UnaryOperator};

/// Number formatting used by string concatenation (`1 + 'a'` is `"1a"`).
fn number_to_string(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Fold a binary operator over two evaluated operands.
pub fn evaluate_binary(
    left: &MetadataValue,
    op: &BinaryOperator,
    right: &MetadataValue,
) -> Option<MetadataValue> {
    use MetadataValue::{Number, String};

    match (left, op, right) {
        (Number(l), BinaryOperator::Add, Number(r)) => Some(Number(l + r)),
        (Number(l), BinaryOperator::Subtract, Number(r)) => Some(Number(l - r)),
        (Number(l), BinaryOperator::Multiply, Number(r)) => Some(Number(l * r)),
        (Number(l), BinaryOperator::Divide, Number(r)) if *r != 0.0 => Some(Number(l / r)),
        (String(l), BinaryOperator::Add, String(r)) => Some(String(format!("{}{}", l, r))),
        (String(l), BinaryOperator::Add, Number(r)) => {
            Some(String(format!("{}{}", l, number_to_string(*r))))
        }
        (Number(l), BinaryOperator::Add, String(r)) => {
            Some(String(format!("{}{}", number_to_string(*l), r)))
        }
        _ => None,
    }
}

/// Fold a prefix operator over an evaluated operand.
pub fn evaluate_unary(op: &UnaryOperator, operand: &MetadataValue) -> Option<MetadataValue> {
    match (op, operand) {
        (UnaryOperator::Minus, MetadataValue::Number(n)) => Some(MetadataValue::Number(-n)),
        (UnaryOperator::Plus, MetadataValue::Number(n)) => Some(MetadataValue::Number(*n)),
        (UnaryOperator::Not, value) => value.is_truthy().map(|t| MetadataValue::Boolean(!t)),
        _ => None,
    }
}
