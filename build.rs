use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        wasm: { target_arch = "wasm32" },
        diagnostics: { any(debug_assertions, feature = "diagnostics") },
    }
}
