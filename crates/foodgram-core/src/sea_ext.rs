use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Case-insensitive substring filter (`LOWER(col) LIKE '%needle%'`).
pub trait ContainsIgnoreCase {
    fn contains_ignore_case<C: ColumnTrait>(self, column: C, needle: &str) -> Self;
}

impl<E> ContainsIgnoreCase for Select<E>
where
    E: EntityTrait,
{
    fn contains_ignore_case<C: ColumnTrait>(self, column: C, needle: &str) -> Self {
        self.filter(contains_ignore_case_expr(column, needle))
    }
}

/// The condition behind [`ContainsIgnoreCase`], usable in joins and subqueries.
pub fn contains_ignore_case_expr<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(pattern)
}

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
