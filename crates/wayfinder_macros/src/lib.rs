use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn, LitInt};

/// Time a function when the `perf_stats` feature is enabled.
///
/// The body is wrapped with a drop guard that logs the elapsed time through
/// Bevy's `warn!` once it exceeds the threshold. Without `perf_stats` the
/// guard is compiled out entirely.
///
/// # Example
/// ```ignore
/// #[profile]      // 1ms threshold
/// pub fn build(corridors: &[Corridor], rooms: &[Room]) -> CorridorGraph { ... }
///
/// #[profile(5)]   // 5ms threshold
/// pub fn breadth_first(graph: &CorridorGraph, ...) -> SearchOutcome { ... }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        let lit = parse_macro_input!(attr as LitInt);
        match lit.base10_parse::<u128>() {
            Ok(value) => value,
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_guard = {
                struct SlowCallGuard {
                    name: &'static str,
                    start: std::time::Instant,
                }
                impl Drop for SlowCallGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        if elapsed.as_millis() >= #threshold_ms {
                            bevy::prelude::warn!("[PERF] {} took {:?} (threshold {}ms)", self.name, elapsed, #threshold_ms);
                        }
                    }
                }
                SlowCallGuard {
                    name: #fn_name_str,
                    start: std::time::Instant::now(),
                }
            };

            #block
        }
    };

    output.into()
}
