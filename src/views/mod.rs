pub mod quiz_form;
pub mod quiz_list;
pub mod settings;
