//! Small presentational building blocks shared by the pages.

mod avatar;
mod button;
mod card;
mod input;

pub use avatar::Avatar;
pub use button::{Button, ButtonVariant};
pub use card::{Card, Skeleton};
pub use input::{Alert, Field, Input, Label};
