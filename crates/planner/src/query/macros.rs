/// Builds a [`QueryColumn`](crate::query::ast::column::QueryColumn):
/// `col!("age")`, `col!("tb_account.age")` or `col!("tb_account", "age")`.
#[macro_export]
macro_rules! col {
    ($name:expr) => {
        $crate::query::ast::column::QueryColumn::new($name)
    };
    ($table:expr, $name:expr) => {
        $crate::query::ast::column::QueryColumn::of($table, $name)
    };
}

/// Collects bind values: `params![18, "michael", None::<i64>]`.
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::model::core::value::Value>::new()
    };
    ($($val:expr),+ $(,)?) => {
        vec![$($crate::model::core::value::Value::from($val)),+]
    };
}
