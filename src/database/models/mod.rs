pub mod assignment;
pub mod auditory;
pub mod event;
pub mod status;
pub mod user;

pub use assignment::*;
pub use auditory::*;
pub use event::*;
pub use status::*;
pub use user::*;
