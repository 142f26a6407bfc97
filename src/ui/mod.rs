pub mod prompts;

pub use prompts::{
    prompt_confirmation, prompt_field_value, prompt_server_config, prompt_server_selection,
};
