pub mod confusion;
