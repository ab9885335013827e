use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;
use wasm_bindgen::JsCast;

mod components {
    use super::*;
    clx! {DialogHeader, div, "modal-header"}
    clx! {DialogTitle, h5, "modal-title"}
    clx! {DialogBody, div, "modal-body"}
    clx! {DialogFooter, div, "modal-footer"}
}

pub use components::*;

/* ========================================================== */
/*                     ✨ FUNCTIONS ✨                        */
/* ========================================================== */

struct OpenDialog {
    host: web_sys::Element,
    on_close: Box<dyn FnOnce(bool)>,
}

/// An open dialog: its host node under `body` and the pending close callback.
///
/// The callback runs at most once, with `true` when the dialog was accepted and `false`
/// when it was dismissed (close icon, cancel). The handle is `Copy` so view closures can
/// hold it.
#[derive(Clone, Copy)]
pub struct DialogHandle {
    inner: StoredValue<Option<OpenDialog>, LocalStorage>,
}

impl DialogHandle {
    pub fn close(&self, accepted: bool) {
        let Some(open) = self.inner.try_update_value(Option::take).flatten() else {
            return;
        };
        open.host.remove();
        (open.on_close)(accepted);
    }
}

/// Mount `view_fn` into a fresh host node appended to `body`.
pub fn open_dialog<F, V>(on_close: impl FnOnce(bool) + 'static, view_fn: F) -> Option<DialogHandle>
where
    F: FnOnce(DialogHandle) -> V + 'static,
    V: IntoView + 'static,
{
    let doc = web_sys::window()?.document()?;
    let body = doc.body()?;
    let host = doc.create_element("div").ok()?;
    let _ = host.set_attribute("data-name", "DialogHost");
    body.append_child(&host).ok()?;

    let handle = DialogHandle {
        inner: StoredValue::new_local(Some(OpenDialog {
            host: host.clone(),
            on_close: Box::new(on_close),
        })),
    };

    let host = host.dyn_into::<web_sys::HtmlElement>().ok()?;
    // The host node is removed on close; the mounted owner lives with the page.
    leptos::mount::mount_to(host, move || view_fn(handle)).forget();

    Some(handle)
}

#[component]
pub fn DialogFrame(
    children: Children,
    handle: DialogHandle,
    #[prop(optional, into)] title: String,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let merged_class = tw_merge!("modal-dialog modal-dialog-centered", class);

    view! {
        <div class="modal-backdrop fade show" data-name="DialogBackdrop"></div>
        <div class="modal fade show d-block" role="dialog" tabindex="-1" data-name="DialogContent">
            <div class=merged_class>
                <div class="modal-content">
                    <DialogHeader>
                        <DialogTitle>{title}</DialogTitle>
                        <button
                            type="button"
                            class="btn btn-sm border-0 p-1 lh-1"
                            data-dialog-close="true"
                            aria-label="Close dialog"
                            on:click=move |_| handle.close(false)
                        >
                            <X />
                        </button>
                    </DialogHeader>
                    {children()}
                </div>
            </div>
        </div>
    }
}
