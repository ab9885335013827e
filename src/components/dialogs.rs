use leptos::prelude::*;

use crate::components::ui::{
    open_dialog, Button, ButtonSize, ButtonVariant, DialogBody, DialogFooter, DialogFrame,
};
use crate::dom;

/// Message box; `on_close` runs once however it is closed.
pub(crate) fn alert_dialog(message: impl Into<String>, on_close: impl FnOnce() + 'static) {
    let message = message.into();
    let opened = open_dialog(
        move |_| on_close(),
        move |handle| {
            let ok = handle;
            view! {
                <DialogFrame handle=handle title="Notice">
                    <DialogBody>
                        <p class="mb-0 text-break">{message}</p>
                    </DialogBody>
                    <DialogFooter>
                        <Button attr:data-dialog-action="ok" on:click=move |_| ok.close(true)>
                            "OK"
                        </Button>
                    </DialogFooter>
                </DialogFrame>
            }
        },
    );
    if opened.is_none() {
        log::error!("alert dialog could not be mounted");
    }
}

/// Ask before doing something; `on_confirm` only runs on the confirm button.
pub(crate) fn confirm_dialog(
    title: impl Into<String>,
    message: impl Into<String>,
    confirm_label: impl Into<String>,
    on_confirm: impl FnOnce() + 'static,
) {
    let title = title.into();
    let message = message.into();
    let confirm_label = confirm_label.into();

    let opened = open_dialog(
        move |accepted| {
            if accepted {
                on_confirm();
            }
        },
        move |handle| {
            let cancel = handle;
            let confirm = handle;
            view! {
                <DialogFrame handle=handle title=title>
                    <DialogBody>
                        <p class="mb-0">{message}</p>
                    </DialogBody>
                    <DialogFooter>
                        <Button
                            variant=ButtonVariant::Outline
                            attr:data-dialog-action="cancel"
                            on:click=move |_| cancel.close(false)
                        >
                            "Cancel"
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            attr:data-dialog-action="confirm"
                            on:click=move |_| confirm.close(true)
                        >
                            {confirm_label}
                        </Button>
                    </DialogFooter>
                </DialogFrame>
            }
        },
    );
    if opened.is_none() {
        log::error!("confirm dialog could not be mounted");
    }
}

/// Shows a freshly minted API token once, with a copy button.
pub(crate) fn token_dialog(token: impl Into<String>, on_close: impl FnOnce() + 'static) {
    let token = token.into();
    let opened = open_dialog(
        move |_| on_close(),
        move |handle| {
            let copied = RwSignal::new(false);
            let to_copy = token.clone();
            let close = handle;
            view! {
                <DialogFrame handle=handle title="New API token">
                    <DialogBody>
                        <p>"Copy the token now, it will not be shown again."</p>
                        <div class="input-group">
                            <input
                                type="text"
                                class="form-control font-monospace"
                                readonly=true
                                prop:value=token
                            />
                            <Button
                                variant=ButtonVariant::Outline
                                size=ButtonSize::Sm
                                attr:data-dialog-action="copy"
                                on:click=move |_| copied.set(dom::copy_text(&to_copy))
                            >
                                {move || if copied.get() { "Copied" } else { "Copy" }}
                            </Button>
                        </div>
                    </DialogBody>
                    <DialogFooter>
                        <Button attr:data-dialog-action="ok" on:click=move |_| close.close(true)>
                            "Close"
                        </Button>
                    </DialogFooter>
                </DialogFrame>
            }
        },
    );
    if opened.is_none() {
        log::error!("token dialog could not be mounted");
    }
}
