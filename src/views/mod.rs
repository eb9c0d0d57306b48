pub mod chat;
pub mod sections;
pub mod shared;

pub use chat::ChatWidget;
pub use sections::{About, Contact, EducationSection, Experience, Hero, NavBar, Skills};
