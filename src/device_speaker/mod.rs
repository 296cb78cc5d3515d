pub mod impl_command;
#[cfg(test)]
pub mod impl_fake;
pub mod interface;
