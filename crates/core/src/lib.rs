pub mod dates;
pub mod money;
pub mod record;
pub mod registry;

pub use money::Money;
pub use record::{parse_expense, ExpenseRecord, ParseError};
pub use registry::{PaymentMethodRegistry, DEFAULT_PAYMENT_METHODS};
