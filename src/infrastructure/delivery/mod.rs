pub mod maddy;
