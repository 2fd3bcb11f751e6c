pub mod fact;
pub mod question;
pub mod template;
