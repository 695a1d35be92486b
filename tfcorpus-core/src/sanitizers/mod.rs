//! Rule compilation for the sensitive-value redactor.
//!
//! Rules are declared as data in `config` and turned into regular expressions
//! here; `redactor` applies them.

pub mod compiler;
