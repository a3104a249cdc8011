pub mod db;

pub use db::{
    create_db, insert_expense, recent_expenses, DbPool, StorageError, StoredExpense,
};
