mod common;
mod evidence;
mod registry;
mod wizard;
