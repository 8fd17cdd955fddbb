use yew::prelude::*;
use shared::constants::UNEXPECTED_ERROR;
use shared::spin_flow::{OutcomeKind, OutcomeStatus};
use crate::config::HandOff;
use crate::styles;

pub fn coins_label(coins: i64) -> String {
    format!("{} {}", coins, if coins == 1 { "coin" } else { "coins" })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ButtonState {
    Loading,
    Spinning,
    NoCoins,
    Ready,
}

impl ButtonState {
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Loading => "Caricamento...",
            ButtonState::Spinning => "Girando...",
            ButtonState::NoCoins => "Monete insufficienti",
            ButtonState::Ready => "Gira per",
        }
    }
}

// Coin pill
#[derive(Properties, PartialEq)]
pub struct CoinPillProps {
    pub coins: i64,
}

#[function_component(CoinPill)]
pub fn coin_pill(props: &CoinPillProps) -> Html {
    html! {
        <div class={styles::COIN_PILL} style="border-color: #FF0054; border-width: 1px;">
            <span class="inline-flex items-center gap-1">
                <img src="/coin.svg" alt="coin" class="w-7 h-6" />
            </span>
            <span class="text-sm font-semibold" style="color: #FF0054;">
                {coins_label(props.coins)}
            </span>
        </div>
    }
}

// Spin button
#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub state: ButtonState,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let busy = matches!(props.state, ButtonState::Loading | ButtonState::Spinning);

    html! {
        <button
            onclick={props.onclick.clone()}
            disabled={busy}
            class={classes!(
                styles::SPIN_BUTTON,
                if busy { "opacity-75 cursor-not-allowed" } else { "" }
            )}
        >
            if busy {
                <svg class="inline-block mr-2 h-5 w-5 animate-spin" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24">
                    <circle class="opacity-25" cx="12" cy="12" r="10" stroke="currentColor" stroke-width="4"></circle>
                    <path class="opacity-75" fill="currentColor" d="M4 12a8 8 0 018-8V0C5.373 0 0 5.373 0 12h4z"></path>
                </svg>
            }
            <span>{props.state.label()}</span>
            if props.state == ButtonState::Ready {
                <img src="/coin.svg" alt="coin" class="ml-2 w-6 h-5" />
            }
        </button>
    }
}

/// One outcome panel button: dismiss, optionally followed by a hand-off.
struct PanelAction {
    label: &'static str,
    hand_off: Option<HandOff>,
    primary: bool,
}

struct PanelContent {
    title: &'static str,
    emoji: &'static str,
    message: String,
    actions: Vec<PanelAction>,
    danger: bool,
}

fn panel_content(outcome: &OutcomeStatus) -> Option<PanelContent> {
    let content = match outcome.kind {
        OutcomeKind::Hidden => return None,
        OutcomeKind::Win => PanelContent {
            title: "Hai Vinto!",
            emoji: "🎉",
            message: "Congratulazioni, hai vinto!".to_string(),
            actions: vec![
                PanelAction { label: "Continua", hand_off: None, primary: true },
                PanelAction { label: "Condividi", hand_off: Some(HandOff::Share), primary: false },
            ],
            danger: false,
        },
        OutcomeKind::Lose => PanelContent {
            title: "Ritenta, sarai più fortunato!",
            emoji: "😔",
            message: "Non è andata bene questa volta, ma puoi riprovare!".to_string(),
            actions: vec![
                PanelAction { label: "Ottieni 1 coin per riprovare", hand_off: Some(HandOff::Share), primary: true },
                PanelAction { label: "Gira di nuovo", hand_off: None, primary: false },
            ],
            danger: false,
        },
        OutcomeKind::Error => PanelContent {
            title: "Ops...",
            emoji: "⚠️",
            message: if outcome.message.is_empty() {
                UNEXPECTED_ERROR.to_string()
            } else {
                outcome.message.clone()
            },
            actions: vec![PanelAction { label: "Chiudi", hand_off: None, primary: true }],
            danger: true,
        },
        OutcomeKind::InsufficientFunds => PanelContent {
            title: "Monete insufficienti",
            emoji: "💰",
            message: outcome.message.clone(),
            actions: vec![PanelAction {
                label: "Ottieni 1 coin per riprovare",
                hand_off: Some(HandOff::Feedback),
                primary: true,
            }],
            danger: false,
        },
    };
    Some(content)
}

#[derive(Properties, PartialEq)]
pub struct StatusModalProps {
    pub outcome: OutcomeStatus,
    pub on_dismiss: Callback<Option<HandOff>>,
}

#[function_component(StatusModal)]
pub fn status_modal(props: &StatusModalProps) -> Html {
    let Some(content) = panel_content(&props.outcome) else {
        return html! {};
    };

    let on_backdrop = {
        let on_dismiss = props.on_dismiss.clone();
        Callback::from(move |_: MouseEvent| on_dismiss.emit(None))
    };
    let stop_propagation = Callback::from(|e: MouseEvent| e.stop_propagation());

    let buttons = content.actions.iter().map(|action| {
        let on_dismiss = props.on_dismiss.clone();
        let hand_off = action.hand_off;
        let class = match (action.primary, content.danger) {
            (true, true) => styles::MODAL_BUTTON_DANGER,
            (true, false) => styles::MODAL_BUTTON_PRIMARY,
            (false, _) => styles::MODAL_BUTTON_SECONDARY,
        };
        html! {
            <button class={class} onclick={Callback::from(move |_: MouseEvent| on_dismiss.emit(hand_off))}>
                {action.label}
            </button>
        }
    });

    let prize_line = match (&props.outcome.kind, props.outcome.prize.as_deref()) {
        (OutcomeKind::Win, Some(prize)) => html! {
            <div class="flex items-center justify-center gap-2 mt-4">
                <span class="text-lg font-medium" style="color: #19171A;">
                    {format!("Hai vinto: {}", prize)}
                </span>
            </div>
        },
        _ => html! {},
    };

    html! {
        <div class={styles::MODAL_BACKDROP} onclick={on_backdrop}>
            <div class={styles::MODAL_CARD} onclick={stop_propagation} role="dialog" aria-modal="true">
                <div class="flex flex-col items-center w-full">
                    <div class="w-24 h-20 flex items-center justify-center mb-1 text-7xl leading-[3.5rem]">
                        {content.emoji}
                    </div>
                    <h2 class="text-xl font-medium text-center" style="color: #19171A;">{content.title}</h2>
                    <p class="mt-1 text-base font-light text-center" style="color: #19171A;">{content.message.clone()}</p>
                </div>
                {prize_line}
                <div class="flex flex-col items-center gap-3 mt-6 w-full">
                    {for buttons}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coins_label_pluralizes() {
        assert_eq!(coins_label(0), "0 coins");
        assert_eq!(coins_label(1), "1 coin");
        assert_eq!(coins_label(3), "3 coins");
    }

    #[test]
    fn test_panel_content_per_outcome() {
        assert!(panel_content(&OutcomeStatus::hidden()).is_none());

        let error = panel_content(&OutcomeStatus::error("")).unwrap();
        assert_eq!(error.message, "Si è verificato un errore inaspettato. Riprova.");
        assert!(error.danger);

        let server = panel_content(&OutcomeStatus::error("Rate limit exceeded")).unwrap();
        assert_eq!(server.message, "Rate limit exceeded");

        let funds = panel_content(&OutcomeStatus::insufficient_funds()).unwrap();
        assert_eq!(funds.actions[0].hand_off, Some(HandOff::Feedback));
    }
}
