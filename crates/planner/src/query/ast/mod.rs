pub mod column;
pub mod condition;
pub mod cte;
pub mod join;
pub mod order;
pub mod row;
pub mod table;
pub mod wrapper;
