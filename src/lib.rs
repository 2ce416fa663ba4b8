pub mod api;
pub mod cli;
pub mod element;
pub mod form;

pub use element::{
    applicator::{apply_element_defaults, process_form_data},
    cleaner::{WireElement, clean_element_for_output, enhance_form_data},
    element_model::Element,
    naming::NameGenerator,
    readonly::{has_condition_data, process_read_only_attribute},
};
pub use form::{
    form_model::{FormConfig, FormData, Section},
    generator::generate_form_data,
    store::SectionStore,
};
