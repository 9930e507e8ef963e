//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Cartola Import"</h1>
            <p class="subtitle">
                "Upload a bank statement (.xlsx) with the columns Fecha, Detalle, "
                "Monto cargo ($), Monto abono ($) and Saldo ($). "
                "Every row becomes a page in your Notion database."
            </p>
        </div>
    }
}
