pub mod easter;
