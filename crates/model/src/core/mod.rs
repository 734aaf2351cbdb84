pub mod db_type;
pub mod value;
