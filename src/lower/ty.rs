//! Type lowering: narrowing a source type down to one of the IR's fixed
//! scalar types.
//!
//! `Double` and `Bool` both lower to `I32`. This is a known placeholder,
//! not an oversight: the pipeline this is modeled on never grew a real
//! floating-point or boolean IR type, and every caller that cares about
//! the distinction (the conditional lowerer, `do_coerce`) works off the
//! *source* type, not the IR type, so the collision is harmless today.
//! It is preserved rather than "fixed" because fixing it would change the
//! result type of every arithmetic and comparison instruction in ways
//! nothing downstream currently expects.

use crate::diagnostics::{SemanticError, Span};
use crate::ir::IrType;
use crate::types::SourceType;

pub fn get_ir_type(ty: &SourceType, span: Span) -> Result<IrType, SemanticError> {
    match ty {
        SourceType::Int => Ok(IrType::I32),
        SourceType::Double => Ok(IrType::I32),
        SourceType::Bool => Ok(IrType::I32),
        SourceType::Byte => Ok(IrType::I8),
        SourceType::Pointer(_) => Ok(IrType::Ptr),
        SourceType::Struct(s) => Err(SemanticError::new(
            format!("cannot lower struct type '{}' to a scalar IR type", s.name),
            span,
        )),
        SourceType::Array(_) => Err(SemanticError::new("cannot lower array type to a scalar IR type", span)),
        SourceType::Function(_) => Err(SemanticError::new("cannot lower function type to a scalar IR type", span)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_and_bool_collide_on_i32() {
        let s = Span::unknown();
        assert_eq!(get_ir_type(&SourceType::Double, s).unwrap(), IrType::I32);
        assert_eq!(get_ir_type(&SourceType::Bool, s).unwrap(), IrType::I32);
    }

    #[test]
    fn byte_lowers_to_i8() {
        assert_eq!(get_ir_type(&SourceType::Byte, Span::unknown()).unwrap(), IrType::I8);
    }

    #[test]
    fn struct_type_is_not_lowerable() {
        use crate::types::StructType;
        use std::rc::Rc;
        let st = SourceType::Struct(Rc::new(StructType { name: "S".into(), fields: vec![], size: 0 }));
        assert!(get_ir_type(&st, Span::unknown()).is_err());
    }
}
