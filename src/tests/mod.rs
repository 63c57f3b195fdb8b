mod dice;
mod expr;

#[cfg(feature = "parse")]
mod command;
