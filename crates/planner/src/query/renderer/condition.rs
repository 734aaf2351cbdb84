use crate::query::{
    ast::condition::{Connector, Operand, QueryCondition},
    error::QueryError,
    renderer::{Render, Renderer},
};

impl Render for QueryCondition {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        let Some(node) = self.effective() else {
            return Ok(());
        };

        match node {
            QueryCondition::Predicate {
                column,
                operator,
                operand,
            } => {
                column.render(r)?;
                r.push(" ");
                r.push(operator.as_sql());
                render_operand(operand, r)
            }
            QueryCondition::Raw { sql, params } => {
                r.push(sql);
                r.params.extend(params.iter().cloned());
                Ok(())
            }
            QueryCondition::Exists { negated, query } => {
                r.push(if *negated { "NOT EXISTS (" } else { "EXISTS (" });
                query.render(r)?;
                r.push(")");
                Ok(())
            }
            QueryCondition::Not(inner) => {
                r.push("NOT (");
                inner.render(r)?;
                r.push(")");
                Ok(())
            }
            QueryCondition::Group(inner) => {
                r.push("(");
                inner.render(r)?;
                r.push(")");
                Ok(())
            }
            QueryCondition::Connector { left, op, right } => {
                render_child(left, *op, r)?;
                r.push(" ");
                r.push(op.as_sql());
                r.push(" ");
                render_child(right, *op, r)
            }
            QueryCondition::Empty => Ok(()),
        }
    }
}

/// A child combined under a different connector keeps its meaning only in
/// parentheses. Raw text may hold any connector, so it is always wrapped.
fn render_child(child: &QueryCondition, parent: Connector, r: &mut Renderer) -> Result<(), QueryError> {
    let wrap = match child.effective() {
        Some(QueryCondition::Raw { .. }) => true,
        _ => child.top_connector().is_some_and(|op| op != parent),
    };
    if wrap {
        r.push("(");
        child.render(r)?;
        r.push(")");
        Ok(())
    } else {
        child.render(r)
    }
}

fn render_operand(operand: &Operand, r: &mut Renderer) -> Result<(), QueryError> {
    match operand {
        Operand::None => {}
        Operand::Value(value) => {
            r.push(" ");
            r.add_param(value.clone());
        }
        Operand::List(values) => {
            r.push(" (");
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    r.push(", ");
                }
                r.add_param(value.clone());
            }
            r.push(")");
        }
        Operand::Range(start, end) => {
            r.push(" ");
            r.add_param(start.clone());
            r.push(" AND ");
            r.add_param(end.clone());
        }
        Operand::Column(column) => {
            r.push(" ");
            column.render(r)?;
        }
        Operand::Query(query) => {
            r.push(" (");
            query.render(r)?;
            r.push(")");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        ast::{column::QueryColumn, wrapper::QueryWrapper},
        column,
        dialect::standard::CommonDialect,
    };
    use model::core::value::Value;

    fn render(cond: &QueryCondition) -> (String, Vec<Value>) {
        let dialect = CommonDialect::mysql();
        let mut r = Renderer::new(&dialect);
        cond.render(&mut r).unwrap();
        r.finish()
    }

    #[test]
    fn test_same_connector_is_flat() {
        let cond = column("a").eq(1).and(column("b").eq(2)).and(column("c").eq(3));
        assert_eq!(render(&cond).0, "`a` = ? AND `b` = ? AND `c` = ?");
    }

    #[test]
    fn test_mixed_connectors_get_parentheses() {
        let cond = column("a")
            .eq(1)
            .and(column("b").eq(2).or(column("c").eq(3)));
        let (sql, params) = render(&cond);
        assert_eq!(sql, "`a` = ? AND (`b` = ? OR `c` = ?)");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

        let cond = column("a").eq(1).or(column("b").eq(2)).and(column("c").eq(3));
        assert_eq!(render(&cond).0, "(`a` = ? OR `b` = ?) AND `c` = ?");
    }

    #[test]
    fn test_empty_side_renders_other_side_only() {
        let cond = QueryCondition::Connector {
            left: Box::new(QueryCondition::Empty),
            op: Connector::Or,
            right: Box::new(column("a").eq(1).and(column("b").eq(2))),
        };
        assert_eq!(render(&cond).0, "`a` = ? AND `b` = ?");

        let nested = column("x").eq(0).and(cond);
        assert_eq!(render(&nested).0, "`x` = ? AND `a` = ? AND `b` = ?");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            render(&column("id").in_list([1, 2, 3])).0,
            "`id` IN (?, ?, ?)"
        );
        assert_eq!(
            render(&column("age").not_between(18, 30)).0,
            "`age` NOT BETWEEN ? AND ?"
        );
        assert_eq!(render(&column("email").is_null()).0, "`email` IS NULL");
        assert_eq!(
            render(&column("user_name").not_like("x")).0,
            "`user_name` NOT LIKE ?"
        );
    }

    #[test]
    fn test_group_not_and_exists() {
        let sub = QueryWrapper::new()
            .select([QueryColumn::all()])
            .from("tb_article")
            .unwrap()
            .where_(column("tb_article.account_id").eq_column(&column("tb_account.id")));
        let cond = column("age")
            .ge(18)
            .group()
            .and(QueryCondition::exists(sub).not());
        assert_eq!(
            render(&cond).0,
            "(`age` >= ?) AND NOT (EXISTS (SELECT * FROM `tb_article` WHERE `account_id` = `tb_account`.`id`))"
        );
    }

    #[test]
    fn test_raw_is_grouped_and_keeps_params_in_place() {
        let cond = column("a")
            .eq(1)
            .and(QueryCondition::raw("b = ? OR c = ?", vec![Value::Int(2), Value::Int(3)]))
            .and(column("d").eq(4));
        let (sql, params) = render(&cond);
        assert_eq!(sql, "`a` = ? AND (b = ? OR c = ?) AND `d` = ?");
        assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
    }
}
