use aula_shared::models::Coupon;
use aula_shared::protocol::{CreateCoupon, ListCoupons};
use leptos::prelude::*;

use super::StudioNav;
use crate::components::collection::{EmptyState, SkeletonList, render_collection};
use crate::components::feedback::SubmitButton;
use crate::components::format;
use crate::components::layout::PageHeader;
use crate::context::use_app;
use crate::query::{keys, use_api_query};

/// Builds the create request from raw form input.
///
/// Codes are upper-cased; the discount must be 1..=100 and the optional usage
/// limit a positive integer.
pub fn parse_coupon_form(code: &str, discount: &str, max_uses: &str) -> Result<CreateCoupon, &'static str> {
    let code = code.trim().to_uppercase();
    if code.is_empty() || code.contains(char::is_whitespace) {
        return Err("El código no puede estar vacío ni tener espacios");
    }
    let discount_percent = discount
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|d| (1..=100).contains(d))
        .ok_or("El descuento debe estar entre 1 y 100")?;
    let max_uses = match max_uses.trim() {
        "" => None,
        raw => Some(
            raw.parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or("El límite de usos debe ser un número positivo")?,
        ),
    };
    Ok(CreateCoupon {
        code,
        discount_percent,
        max_uses,
        course_id: None,
    })
}

#[component]
pub fn CouponsPage() -> impl IntoView {
    let coupons = use_api_query(keys::coupons(), || ListCoupons);

    view! {
        <PageHeader title="Cupones" subtitle="Descuentos para tus estudiantes." />
        <StudioNav />
        <NewCouponForm />
        {move || {
            let state = coupons.get();
            render_collection(
                &state,
                || view! { <SkeletonList /> }.into_any(),
                || {
                    view! {
                        <EmptyState
                            title="No hay cupones"
                            message="Crea tu primer cupón con el formulario de arriba."
                        />
                    }
                        .into_any()
                },
                |items| {
                    view! {
                        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Código"</th>
                                        <th>"Descuento"</th>
                                        <th>"Usos"</th>
                                        <th>"Vence"</th>
                                        <th>"Estado"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {items.iter().map(coupon_row).collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                        .into_any()
                },
            )
        }}
    }
}

fn coupon_row(coupon: &Coupon) -> impl IntoView + use<> {
    let uses = match coupon.max_uses {
        Some(max) => format!("{} / {max}", coupon.used_count),
        None => coupon.used_count.to_string(),
    };
    let exhausted = coupon.remaining_uses() == Some(0);
    let status = match (coupon.is_active, exhausted) {
        (false, _) => ("badge badge-ghost", "Inactivo"),
        (true, true) => ("badge badge-warning", "Agotado"),
        (true, false) => ("badge badge-success", "Activo"),
    };
    view! {
        <tr>
            <td class="font-mono">{coupon.code.clone()}</td>
            <td>{coupon.discount_percent} "%"</td>
            <td>{uses}</td>
            <td>{format::date(coupon.expires_at)}</td>
            <td>
                <span class=status.0>{status.1}</span>
            </td>
        </tr>
    }
}

#[component]
fn NewCouponForm() -> impl IntoView {
    let app = use_app();
    let pending = RwSignal::new(false);
    let (code, set_code) = signal(String::new());
    let (discount, set_discount) = signal(String::new());
    let (max_uses, set_max_uses) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<&'static str>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let req = match parse_coupon_form(&code.get(), &discount.get(), &max_uses.get()) {
            Ok(req) => req,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };
        set_error_msg.set(None);
        app.mutate(pending, req, vec![keys::coupons()], move |result| match result {
            Ok(created) => {
                set_code.set(String::new());
                set_discount.set(String::new());
                set_max_uses.set(String::new());
                app.notify(format!("Cupón {} creado", created.code));
            }
            Err(e) => app.notify_error(&e),
        });
    };

    view! {
        <form class="card bg-base-100 shadow" on:submit=on_submit>
            <div class="card-body gap-3">
                <h2 class="card-title text-lg">"Nuevo cupón"</h2>
                {move || {
                    error_msg
                        .get()
                        .map(|msg| {
                            view! {
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    {msg}
                                </div>
                            }
                        })
                }}
                <div class="flex flex-col md:flex-row gap-3">
                    <input
                        class="input input-bordered uppercase"
                        placeholder="CODIGO10"
                        prop:value=code
                        on:input=move |ev| set_code.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        min="1"
                        max="100"
                        class="input input-bordered"
                        placeholder="% descuento"
                        prop:value=discount
                        on:input=move |ev| set_discount.set(event_target_value(&ev))
                    />
                    <input
                        type="number"
                        min="1"
                        class="input input-bordered"
                        placeholder="Usos máximos (opcional)"
                        prop:value=max_uses
                        on:input=move |ev| set_max_uses.set(event_target_value(&ev))
                    />
                    <SubmitButton pending=pending label="Crear" />
                </div>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_form_builds_the_request() {
        let req = parse_coupon_form(" rust10 ", "10", "").unwrap();
        assert_eq!(req.code, "RUST10");
        assert_eq!(req.discount_percent, 10);
        assert_eq!(req.max_uses, None);

        let limited = parse_coupon_form("VERANO", "100", " 25 ").unwrap();
        assert_eq!(limited.max_uses, Some(25));
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(parse_coupon_form("", "10", "").is_err());
        assert!(parse_coupon_form("DOS PALABRAS", "10", "").is_err());
        assert!(parse_coupon_form("X", "0", "").is_err());
        assert!(parse_coupon_form("X", "101", "").is_err());
        assert!(parse_coupon_form("X", "diez", "").is_err());
        assert!(parse_coupon_form("X", "10", "0").is_err());
        assert!(parse_coupon_form("X", "10", "-3").is_err());
    }
}
