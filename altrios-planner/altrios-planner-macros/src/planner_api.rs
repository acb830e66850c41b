use crate::imports::*;

pub(crate) fn planner_api(attr: TokenStream, item: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(item as syn::ItemStruct);
    let ident = &ast.ident;

    if !matches!(ast.fields, syn::Fields::Named(_)) {
        abort_call_site!("Invalid use of `planner_api` macro.  Expected C-style struct.");
    }

    let extra_fns: TokenStream2 = attr.into();
    let mut output = TokenStream2::default();

    output.extend::<TokenStream2>(quote! {
        #[cfg_attr(feature = "pyo3", pyclass(module = "altrios_planner"))]
    });
    output.extend(ast.to_token_stream());

    output.extend::<TokenStream2>(quote! {
        #[cfg(feature = "pyo3")]
        #[pymethods]
        impl #ident {
            #extra_fns

            #[staticmethod]
            #[pyo3(name = "default")]
            /// Exposes `default` to python.
            fn default_py() -> Self {
                Self::default()
            }

            /// Returns a deep copy of `self`.
            fn copy(&self) -> Self {
                self.clone()
            }

            /// Write (serialize) an object into a string
            ///
            /// # Arguments:
            ///
            /// * `format`: `str` - The target format, any of those listed in [`ACCEPTED_STR_FORMATS`](`SerdeAPI::ACCEPTED_STR_FORMATS`)
            ///
            #[pyo3(name = "to_str")]
            fn to_str_py(&self, format: &str) -> anyhow::Result<String> {
                self.to_str(format)
            }

            /// Read (deserialize) an object from a string
            ///
            /// # Arguments:
            ///
            /// * `contents`: `str` - The string containing the object data
            /// * `format`: `str` - The source format, any of those listed in [`ACCEPTED_STR_FORMATS`](`SerdeAPI::ACCEPTED_STR_FORMATS`)
            ///
            #[staticmethod]
            #[pyo3(name = "from_str", signature = (contents, format, skip_init=false))]
            fn from_str_py(contents: &str, format: &str, skip_init: bool) -> anyhow::Result<Self> {
                Self::from_str(contents, format, skip_init)
            }

            /// Write (serialize) an object to a JSON string
            #[pyo3(name = "to_json")]
            fn to_json_py(&self) -> anyhow::Result<String> {
                self.to_json()
            }

            /// Read (deserialize) an object from a JSON string
            #[staticmethod]
            #[pyo3(name = "from_json", signature = (json_str, skip_init=false))]
            fn from_json_py(json_str: &str, skip_init: bool) -> anyhow::Result<Self> {
                Self::from_json(json_str, skip_init)
            }

            /// Write (serialize) an object to a YAML string
            #[pyo3(name = "to_yaml")]
            fn to_yaml_py(&self) -> anyhow::Result<String> {
                self.to_yaml()
            }

            /// Read (deserialize) an object from a YAML string
            #[staticmethod]
            #[pyo3(name = "from_yaml", signature = (yaml_str, skip_init=false))]
            fn from_yaml_py(yaml_str: &str, skip_init: bool) -> anyhow::Result<Self> {
                Self::from_yaml(yaml_str, skip_init)
            }

            /// Write (serialize) an object to a file.
            /// Supported file extensions are listed in [`ACCEPTED_BYTE_FORMATS`](`SerdeAPI::ACCEPTED_BYTE_FORMATS`).
            #[pyo3(name = "to_file")]
            fn to_file_py(&self, filepath: std::path::PathBuf) -> anyhow::Result<()> {
                self.to_file(filepath)
            }

            /// Read (deserialize) an object from a file.
            /// Supported file extensions are listed in [`ACCEPTED_BYTE_FORMATS`](`SerdeAPI::ACCEPTED_BYTE_FORMATS`).
            #[staticmethod]
            #[pyo3(name = "from_file", signature = (filepath, skip_init=false))]
            fn from_file_py(filepath: std::path::PathBuf, skip_init: bool) -> anyhow::Result<Self> {
                Self::from_file(filepath, skip_init)
            }
        }
    });

    output.into()
}
