use crate::imports::*;

pub(crate) fn serde_api_derive(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as syn::DeriveInput);
    let ident = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let output = quote! {
        impl #impl_generics SerdeAPI for #ident #ty_generics #where_clause {}
    };
    output.into()
}
