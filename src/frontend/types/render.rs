//! User-facing rendering of types.

use std::fmt;

use super::{ParamOwner, Ty};
use crate::frontend::symbols::SymbolTable;

/// Displays a [`Ty`] with class and parameter names resolved through the symbol table.
///
/// Inference variables render as `?N`.
pub struct TyDisplay<'a> {
    ty: &'a Ty,
    symbols: &'a SymbolTable,
}

impl<'a> TyDisplay<'a> {
    pub fn new(ty: &'a Ty, symbols: &'a SymbolTable) -> Self {
        Self { ty, symbols }
    }

    fn nested(&self, ty: &'a Ty) -> TyDisplay<'a> {
        TyDisplay::new(ty, self.symbols)
    }

    fn write_list(&self, f: &mut fmt::Formatter<'_>, items: &'a [Ty], sep: &str) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", self.nested(item))?;
        }
        Ok(())
    }
}

impl fmt::Display for TyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Ty::Class(c) => {
                f.write_str(&self.symbols.class(c.id).name)?;
                if !c.args.is_empty() {
                    f.write_str("<")?;
                    self.write_list(f, &c.args, ", ")?;
                    f.write_str(">")?;
                }
                Ok(())
            }
            Ty::Companion(id) => write!(f, "{}.Companion", self.symbols.class(*id).name),
            Ty::Param(p) => {
                let name = match p.owner {
                    ParamOwner::Class(id) => self.symbols.class(id).type_params.get(p.index).map(|tp| tp.name.as_str()),
                    ParamOwner::Function(id) => self
                        .symbols
                        .function(id)
                        .type_params
                        .get(p.index)
                        .map(|tp| tp.name.as_str()),
                };
                f.write_str(name.unwrap_or("?"))
            }
            Ty::Var(v) => write!(f, "?{}", v.0),
            Ty::Function(func) => {
                if let Some(receiver) = &func.receiver {
                    match receiver.as_ref() {
                        Ty::Function(_) | Ty::Intersection(_) => write!(f, "({}).", self.nested(receiver))?,
                        other => write!(f, "{}.", self.nested(other))?,
                    }
                }
                f.write_str("(")?;
                self.write_list(f, &func.params, ", ")?;
                write!(f, ") -> {}", self.nested(&func.ret))
            }
            Ty::Intersection(members) => self.write_list(f, members, " & "),
            Ty::Nothing => f.write_str("Nothing"),
            Ty::Error => f.write_str("<error>"),
        }
    }
}
