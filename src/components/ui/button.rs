use leptos::prelude::*;
use leptos_ui::variants;

// Classes target the Bootstrap sheet the server pages already ship.
variants! {
    Button {
        base: "btn d-inline-flex align-items-center gap-2 text-nowrap",
        variants: {
            variant: {
                Default: "btn-primary",
                Destructive: "btn-danger",
                Outline: "btn-outline-secondary",
                Secondary: "btn-secondary",
                Link: "btn-link",
            },
            size: {
                Default: "",
                Sm: "btn-sm",
                Icon: "btn-sm p-1 lh-1",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
