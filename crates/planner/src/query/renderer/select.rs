//! SELECT rendering stages shared by every paging strategy.

use crate::query::{
    ast::{
        column::ColumnKind,
        join::Join,
        order::{Direction, Nulls, OrderBy, OrderItem},
        table::{QueryTable, TableSource},
        wrapper::QueryWrapper,
    },
    error::QueryError,
    renderer::{Render, Renderer, column::SelectItem},
    safety,
};

/// Text a paging strategy places right after `SELECT`, e.g. `TOP 10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectHead {
    pub text: String,
    /// Whether the text belongs after a leading `DISTINCT` (`SELECT DISTINCT TOP 10`).
    pub after_distinct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub head: Option<SelectHead>,
    /// Prepends `ROW_NUMBER() OVER (<order by>) AS <alias>` to the select
    /// list and moves the ORDER BY clause into the window.
    pub row_number_alias: Option<&'static str>,
}

impl Render for QueryWrapper {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        let dialect = r.dialect;
        dialect.limit_offset().render(self, r)?;

        for fragment in &self.end_fragments {
            r.push(" ");
            r.push(fragment);
        }

        for union in &self.unions {
            r.push(" ");
            r.push(union.kind.as_sql());
            r.push(" ");
            let nested = !union.query.order_by.is_empty() || union.query.has_limit();
            if nested {
                r.push("(");
            }
            union.query.render(r)?;
            if nested {
                r.push(")");
            }
        }
        Ok(())
    }
}

/// Renders `WITH [RECURSIVE] name(cols) AS (...), ...` without a trailing
/// space. Returns whether anything was written.
pub fn render_ctes(query: &QueryWrapper, r: &mut Renderer) -> Result<bool, QueryError> {
    if query.with.is_empty() {
        return Ok(false);
    }
    r.push(if query.with.recursive {
        "WITH RECURSIVE "
    } else {
        "WITH "
    });
    for (i, cte) in query.with.items.iter().enumerate() {
        if i > 0 {
            r.push(", ");
        }
        r.push_identifier(&cte.name)?;
        if !cte.columns.is_empty() {
            r.push("(");
            for (j, column) in cte.columns.iter().enumerate() {
                if j > 0 {
                    r.push(", ");
                }
                r.push_identifier(column)?;
            }
            r.push(")");
        }
        r.push(" AS (");
        cte.query.render(r)?;
        r.push(")");
    }
    Ok(true)
}

/// Renders the CTE preamble followed by the select core.
pub fn render_standard(
    query: &QueryWrapper,
    r: &mut Renderer,
    options: &SelectOptions,
) -> Result<(), QueryError> {
    if render_ctes(query, r)? {
        r.push(" ");
    }
    render_core(query, r, options)
}

/// `SELECT ... FROM ... [JOIN ...] [WHERE] [GROUP BY] [HAVING] [ORDER BY]`,
/// rendered inside the query's own table scope.
pub fn render_core(
    query: &QueryWrapper,
    r: &mut Renderer,
    options: &SelectOptions,
) -> Result<(), QueryError> {
    check_duplicate_tables(query)?;
    if let Some(alias) = options.row_number_alias
        && query.has_distinct()
    {
        return render_numbered_distinct(query, r, alias);
    }
    r.push_scope(query);
    let result = render_core_in_scope(query, r, options);
    r.pop_scope();
    result
}

fn render_core_in_scope(
    query: &QueryWrapper,
    r: &mut Renderer,
    options: &SelectOptions,
) -> Result<(), QueryError> {
    r.push("SELECT ");
    if let Some(hint) = &query.hint {
        r.push("/*+ ");
        r.push(hint);
        r.push(" */ ");
    }

    if let Some(alias) = options.row_number_alias {
        render_row_number(&query.order_by, alias, r)?;
        r.push(", ");
    }

    render_select_list(query, r, options.head.as_ref())?;

    if !query.from.is_empty() {
        r.push(" FROM ");
        for (i, table) in query.from.iter().enumerate() {
            if i > 0 {
                r.push(", ");
            }
            render_table(table, r)?;
        }
    }

    for join in query.included_joins() {
        r.push(" ");
        render_join(join, r)?;
    }

    if !query.where_clause.is_empty() {
        r.push(" WHERE ");
        query.where_clause.render(r)?;
    }

    if !query.group_by.is_empty() {
        r.push(" GROUP BY ");
        r.push_list(&query.group_by, ", ")?;
    }

    if !query.having.is_empty() {
        r.push(" HAVING ");
        query.having.render(r)?;
    }

    if !query.order_by.is_empty() && options.row_number_alias.is_none() {
        r.push(" ");
        render_order_by(&query.order_by, r)?;
    }
    Ok(())
}

/// `ROW_NUMBER() OVER (<order by>) AS <alias>`
fn render_row_number(items: &[OrderItem], alias: &str, r: &mut Renderer) -> Result<(), QueryError> {
    r.push("ROW_NUMBER() OVER (");
    if items.is_empty() {
        r.push("ORDER BY CURRENT_TIMESTAMP");
    } else {
        render_order_by(items, r)?;
    }
    r.push(") AS ");
    r.push(alias);
    Ok(())
}

/// A window function cannot share a select list with `DISTINCT`, so the
/// distinct rows are numbered from outside:
/// `SELECT ROW_NUMBER() OVER (...) AS __rn, * FROM (SELECT DISTINCT ...) AS temp_distinct`.
/// The ORDER BY then names the derived table's output columns.
fn render_numbered_distinct(
    query: &QueryWrapper,
    r: &mut Renderer,
    alias: &str,
) -> Result<(), QueryError> {
    r.push("SELECT ");
    render_row_number(&unqualified(&query.order_by), alias, r)?;
    r.push(", * FROM (");

    let mut inner = query.clone();
    inner.order_by.clear();
    r.push_scope(&inner);
    let result = render_core_in_scope(&inner, r, &SelectOptions::default());
    r.pop_scope();
    result?;

    r.push(")");
    r.push(r.dialect.table_alias_separator());
    r.push("temp_distinct");
    Ok(())
}

fn unqualified(items: &[OrderItem]) -> Vec<OrderItem> {
    items
        .iter()
        .cloned()
        .map(|mut item| {
            if let OrderItem::Column(order) = &mut item
                && let ColumnKind::Named { table, .. } = &mut order.column.kind
            {
                *table = None;
            }
            item
        })
        .collect()
}

fn render_select_list(
    query: &QueryWrapper,
    r: &mut Renderer,
    head: Option<&SelectHead>,
) -> Result<(), QueryError> {
    let mut columns = query.select.iter().peekable();

    if let Some(head) = head {
        let leading_distinct = columns.peek().and_then(|c| match &c.kind {
            ColumnKind::Distinct(inner) => Some(inner),
            _ => None,
        });
        match leading_distinct {
            Some(inner) if head.after_distinct => {
                r.push("DISTINCT ");
                r.push(&head.text);
                r.push(" ");
                r.push_list(inner, ", ")?;
                columns.next();
                for column in columns {
                    r.push(", ");
                    SelectItem(column).render(r)?;
                }
                return Ok(());
            }
            _ => {
                r.push(&head.text);
                r.push(" ");
            }
        }
    }

    if query.select.is_empty() {
        r.push("*");
        return Ok(());
    }
    for (i, column) in columns.enumerate() {
        if i > 0 {
            r.push(", ");
        }
        SelectItem(column).render(r)?;
    }
    Ok(())
}

pub fn render_table(table: &QueryTable, r: &mut Renderer) -> Result<(), QueryError> {
    match &table.source {
        TableSource::Named { .. } => r.push_table_name(table)?,
        TableSource::Derived(query) => {
            r.push("(");
            query.render(r)?;
            r.push(")");
        }
    }
    if let Some(alias) = &table.alias {
        r.push(r.dialect.table_alias_separator());
        r.push_identifier(alias)?;
    }
    Ok(())
}

pub fn render_join(join: &Join, r: &mut Renderer) -> Result<(), QueryError> {
    r.push(join.kind.as_sql());
    r.push(" ");
    render_table(&join.table, r)?;
    if let Some(on) = join.on.as_ref().filter(|on| !on.is_empty()) {
        r.push(" ON ");
        on.render(r)?;
    }
    Ok(())
}

/// `ORDER BY a DESC, b`
pub fn render_order_by(items: &[OrderItem], r: &mut Renderer) -> Result<(), QueryError> {
    r.push("ORDER BY ");
    r.push_list(items, ", ")
}

impl Render for OrderItem {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        match self {
            OrderItem::Column(order) => order.render(r),
            OrderItem::Raw(text) => {
                safety::check_order_by(text)?;
                r.push(text);
                Ok(())
            }
        }
    }
}

impl Render for OrderBy {
    fn render(&self, r: &mut Renderer) -> Result<(), QueryError> {
        self.column.render(r)?;
        match self.direction {
            Some(Direction::Asc) => r.push(" ASC"),
            Some(Direction::Desc) => r.push(" DESC"),
            None => {}
        }
        match self.nulls {
            Some(Nulls::First) => r.push(" NULLS FIRST"),
            Some(Nulls::Last) => r.push(" NULLS LAST"),
            None => {}
        }
        Ok(())
    }
}

/// The select list as seen from outside a wrapping sub-query: each column's
/// alias or bare name, or `*` when some column has neither.
pub fn outer_select_list(query: &QueryWrapper) -> String {
    let names: Option<Vec<&str>> = query
        .select
        .iter()
        .map(|column| column.alias_or_name().filter(|name| *name != "*"))
        .collect();
    match names {
        Some(names) if !names.is_empty() => names.join(", "),
        _ => "*".to_string(),
    }
}

fn check_duplicate_tables(query: &QueryWrapper) -> Result<(), QueryError> {
    let tables = query.query_tables();
    for (i, table) in tables.iter().enumerate() {
        let duplicate = tables[i + 1..]
            .iter()
            .any(|other| table.is_same_table(other) && table.alias == other.alias);
        if duplicate {
            return Err(QueryError::DuplicateTable(
                table.name().unwrap_or_default().to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{
        ast::column::QueryColumn, column, dialect::standard::CommonDialect, table,
    };

    fn render(query: &QueryWrapper) -> Result<String, QueryError> {
        let dialect = CommonDialect::mysql();
        let mut r = Renderer::new(&dialect);
        query.render(&mut r)?;
        Ok(r.finish().0)
    }

    #[test]
    fn test_empty_select_list_is_star() {
        let query = QueryWrapper::new().from("tb_account").unwrap();
        assert_eq!(render(&query).unwrap(), "SELECT * FROM `tb_account`");
    }

    #[test]
    fn test_clause_order() {
        let query = QueryWrapper::new()
            .hint("INDEX(tb_account idx_age)")
            .select([column("sex"), QueryColumn::count_all().as_("total")])
            .from("tb_account")
            .unwrap()
            .where_(column("age").ge(18))
            .group_by([column("sex")])
            .having(QueryColumn::count_all().gt(1))
            .order_by(column("sex").asc().nulls_last())
            .limit(5)
            .for_update();
        assert_eq!(
            render(&query).unwrap(),
            "SELECT /*+ INDEX(tb_account idx_age) */ `sex`, COUNT(*) AS `total` FROM `tb_account` \
             WHERE `age` >= ? GROUP BY `sex` HAVING COUNT(*) > ? ORDER BY `sex` ASC NULLS LAST \
             LIMIT 5 FOR UPDATE"
        );
    }

    #[test]
    fn test_ctes_and_unions() {
        let recent = QueryWrapper::new()
            .select([column("id")])
            .from("tb_article")
            .unwrap()
            .where_(column("hits").gt(100));
        let query = QueryWrapper::new()
            .with("hot", &["id"], recent)
            .unwrap()
            .select([column("id")])
            .from("hot")
            .unwrap()
            .union_all(
                QueryWrapper::new()
                    .select([column("id")])
                    .from("tb_pinned")
                    .unwrap()
                    .order_by(column("id").desc())
                    .limit(3),
            );
        assert_eq!(
            render(&query).unwrap(),
            "WITH `hot`(`id`) AS (SELECT `id` FROM `tb_article` WHERE `hits` > ?) \
             SELECT `id` FROM `hot` UNION ALL (SELECT `id` FROM `tb_pinned` ORDER BY `id` DESC LIMIT 3)"
        );
    }

    #[test]
    fn test_derived_table_and_cross_join() {
        let inner = QueryWrapper::new()
            .select([column("account_id")])
            .from("tb_article")
            .unwrap();
        let query = QueryWrapper::new()
            .from_query(inner)
            .as_("t")
            .unwrap()
            .cross_join("tb_tag")
            .unwrap()
            .finish();
        assert_eq!(
            render(&query).unwrap(),
            "SELECT * FROM (SELECT `account_id` FROM `tb_article`) AS `t` CROSS JOIN `tb_tag`"
        );
    }

    #[test]
    fn test_self_join_needs_alias() {
        let query = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .left_join("tb_account")
            .unwrap()
            .on(column("tb_account.id").eq(1));
        assert_eq!(
            render(&query),
            Err(QueryError::DuplicateTable("tb_account".to_string()))
        );

        let aliased = QueryWrapper::new()
            .from("tb_account")
            .unwrap()
            .left_join("tb_account")
            .unwrap()
            .as_("parent")
            .unwrap()
            .on(column("parent.id").eq_column(&column("tb_account.parent_id")));
        assert_eq!(
            render(&aliased).unwrap(),
            "SELECT * FROM `tb_account` LEFT JOIN `tb_account` AS `parent` \
             ON `parent`.`id` = `tb_account`.`parent_id`"
        );
    }

    #[test]
    fn test_outer_select_list() {
        let query = QueryWrapper::new().select([column("id").as_("user_id"), column("age")]);
        assert_eq!(outer_select_list(&query), "user_id, age");

        let with_function = QueryWrapper::new().select([column("id"), QueryColumn::count_all()]);
        assert_eq!(outer_select_list(&with_function), "*");
        assert_eq!(outer_select_list(&QueryWrapper::new()), "*");
    }

    #[test]
    fn test_schema_qualified_table() {
        let query = QueryWrapper::new().from_table(table("sales.tb_account").as_("a"));
        assert_eq!(
            render(&query).unwrap(),
            "SELECT * FROM `sales`.`tb_account` AS `a`"
        );
    }
}
