pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod types;

pub use pipeline::{parse_tickets_csv, parse_tickets_reader};
pub use types::{ParseOutput, ParseWarning, Ticket, TicketRaw};
