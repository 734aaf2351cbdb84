use crate::query::{
    ast::column::{ColumnKind, QueryColumn},
    error::QueryError,
    renderer::{Render, Renderer},
    safety,
};

/// Renders the column expression without its alias, as used in
/// predicates, GROUP BY and ORDER BY.
impl Render for QueryColumn {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        match &self.kind {
            ColumnKind::Named { table, name } => {
                if let Some(qualifier) = table.as_deref().and_then(|t| r.qualifier_for(t)) {
                    r.push_identifier(&qualifier)?;
                    r.push(".");
                }
                r.push_identifier(name)
            }
            ColumnKind::Function { name, args } => {
                safety::check_identifier(name)?;
                r.push(name);
                r.push("(");
                r.push_list(args, ", ")?;
                r.push(")");
                Ok(())
            }
            ColumnKind::Distinct(columns) => {
                r.push("DISTINCT ");
                r.push_list(columns, ", ")
            }
            ColumnKind::Raw { sql, params } => {
                r.push(sql);
                r.params.extend(params.iter().cloned());
                Ok(())
            }
            ColumnKind::Param(value) => {
                r.add_param(value.clone());
                Ok(())
            }
            ColumnKind::Arithmetic { left, op, right } => {
                render_operand(left, r)?;
                r.push(" ");
                r.push(op.as_sql());
                r.push(" ");
                render_operand(right, r)
            }
            ColumnKind::SubSelect(query) => {
                r.push("(");
                query.render(r)?;
                r.push(")");
                Ok(())
            }
        }
    }
}

fn render_operand(column: &QueryColumn, r: &mut Renderer) -> Result<(), QueryError> {
    if matches!(column.kind, ColumnKind::Arithmetic { .. }) {
        r.push("(");
        column.render(r)?;
        r.push(")");
        Ok(())
    } else {
        column.render(r)
    }
}

/// A select-list entry: the expression followed by `AS alias` when aliased.
pub struct SelectItem<'c>(pub &'c QueryColumn);

impl Render for SelectItem<'_> {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        self.0.render(r)?;
        if let Some(alias) = &self.0.alias {
            r.push(" AS ");
            r.push_identifier(alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        ast::wrapper::QueryWrapper, column, dialect::standard::CommonDialect,
    };
    use model::core::value::Value;

    fn render(column: &QueryColumn) -> (String, Vec<Value>) {
        let dialect = CommonDialect::mysql();
        let mut r = Renderer::new(&dialect);
        SelectItem(column).render(&mut r).unwrap();
        r.finish()
    }

    #[test]
    fn test_named_and_aliased() {
        assert_eq!(render(&column("id").as_("user_id")).0, "`id` AS `user_id`");
        assert_eq!(render(&QueryColumn::all()).0, "*");
        assert_eq!(render(&column("tb_account.id")).0, "`tb_account`.`id`");
    }

    #[test]
    fn test_functions_and_distinct() {
        assert_eq!(render(&QueryColumn::count_all()).0, "COUNT(*)");
        assert_eq!(
            render(&QueryColumn::max(column("age")).as_("oldest")).0,
            "MAX(`age`) AS `oldest`"
        );
        assert_eq!(
            render(&QueryColumn::distinct(vec![column("sex"), column("age")])).0,
            "DISTINCT `sex`, `age`"
        );
    }

    #[test]
    fn test_params_follow_text_order() {
        let expr = QueryColumn::raw("IF(age > ?, 1, 0)", vec![Value::Int(18)])
            .add(QueryColumn::param(5))
            .multiply(column("weight").subtract(QueryColumn::param(1)));
        let (sql, params) = render(&expr);
        assert_eq!(sql, "(IF(age > ?, 1, 0) + ?) * (`weight` - ?)");
        assert_eq!(params, vec![Value::Int(18), Value::Int(5), Value::Int(1)]);
    }

    #[test]
    fn test_sub_select() {
        let sub = QueryWrapper::new()
            .select([QueryColumn::max(column("id"))])
            .from("tb_article")
            .unwrap();
        assert_eq!(
            render(&QueryColumn::sub_select(sub).as_("last_id")).0,
            "(SELECT MAX(`id`) FROM `tb_article`) AS `last_id`"
        );
    }

    #[test]
    fn test_unsafe_function_name_is_rejected() {
        let dialect = CommonDialect::mysql();
        let mut r = Renderer::new(&dialect);
        let bad = QueryColumn::function("MAX(1);--", vec![]);
        assert!(matches!(
            bad.render(&mut r),
            Err(QueryError::UnsafeIdentifier { .. })
        ));
    }
}
