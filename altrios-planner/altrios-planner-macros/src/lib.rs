mod imports;
use imports::*;
mod planner_api;
mod serde_api_derive;

#[proc_macro_error]
#[proc_macro_attribute]
/// Macro for exposing a planner struct to python as a `pyclass` with the
/// `SerdeAPI` methods attached.  Any function definitions passed as the
/// attribute argument are added to the generated `#[pymethods]` block.
pub fn planner_api(attr: TokenStream, item: TokenStream) -> TokenStream {
    planner_api::planner_api(attr, item)
}

#[proc_macro_derive(SerdeAPI)]
/// Implements `SerdeAPI` with default methods.  Structs that need custom
/// validation in `init` should implement the trait by hand instead.
pub fn serde_api_derive(input: TokenStream) -> TokenStream {
    serde_api_derive::serde_api_derive(input)
}
