use gloo_timers::callback::Interval;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos_router::components::Router;
use leptos_router::hooks::use_query_map;
use vibefiction_shared::countdown::Tick;
use vibefiction_shared::request::ApiCall;
use vibefiction_shared::routes::{self, NOVEL_ID_PARAM};
use vibefiction_shared::session::{ProposalCard, VoteSession};
use vibefiction_shared::timer::TimerSlot;
use vibefiction_shared::{ClientError, FinalizeOutcome, NovelDetail, VoteBoard};
use wasm_bindgen_futures::spawn_local;

use crate::auth::AuthState;
use crate::config::TICK_MILLIS;
use crate::{api, nav};

type Session = RwSignal<Option<VoteSession>>;
type Timer = StoredValue<TimerSlot<Interval>, LocalStorage>;

/// Vote page SPA, mounted on /vote-page?novelId=N.
#[component]
pub fn VoteApp() -> impl IntoView {
    view! {
        <Router>
            <VotePage />
        </Router>
    }
}

#[component]
fn VotePage() -> impl IntoView {
    let query = use_query_map();
    let novel_id = query.with_untracked(|q| q.get(NOVEL_ID_PARAM));

    match routes::parse_novel_id(novel_id.as_deref()) {
        Ok(novel_id) => view! { <VoteBoardView novel_id=novel_id /> }.into_any(),
        Err(e) => {
            log::error!("vote page opened without a usable novel id: {novel_id:?}");
            view! {
                <div class="proposal-grid">
                    <p class="vote-error">{e.to_string()}</p>
                </div>
            }
            .into_any()
        }
    }
}

// ── Board ──

#[component]
fn VoteBoardView(novel_id: i64) -> impl IntoView {
    let auth = use_context::<AuthState>();
    let session: Session = RwSignal::new(None);
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let selected: RwSignal<Option<i64>> = RwSignal::new(None);
    let novel_chapter: RwSignal<Option<i64>> = RwSignal::new(None);
    let timer: Timer = StoredValue::new_local(TimerSlot::new());

    on_cleanup(move || {
        timer.update_value(|slot| {
            slot.cancel();
        })
    });

    // Proposals, deadline and the fallback chapter id
    spawn_local(async move {
        match api::fetch::<VoteBoard>(&ApiCall::ListProposals { novel_id }).await {
            Ok(board) => {
                log::info!("novel {novel_id}: {} proposals", board.proposals.len());
                let mut s = VoteSession::from_board(novel_id, board);
                s.resolve_latest_chapter(novel_chapter.get_untracked());
                let has_deadline = s.countdown().is_some();
                session.set(Some(s));
                if has_deadline {
                    start_countdown(session, timer);
                }
            }
            Err(e) => {
                log::error!("novel {novel_id}: proposals failed to load: {e}");
                error.set(Some(e.load_message()));
            }
        }
        loading.set(false);
    });

    // Latest chapter for "continue writing"
    spawn_local(async move {
        match api::fetch::<NovelDetail>(&ApiCall::NovelDetail { novel_id }).await {
            Ok(novel) => {
                let latest = novel.latest_chapter_id();
                novel_chapter.set(latest);
                session.update(|s| {
                    if let Some(s) = s.as_mut() {
                        s.resolve_latest_chapter(latest);
                    }
                });
            }
            Err(e) => log::warn!("novel {novel_id}: detail unavailable: {e}"),
        }
    });

    let voting_open = Signal::derive(move || {
        session.with(|s| s.as_ref().is_some_and(VoteSession::voting_open))
    });
    let can_continue =
        move || session.with(|s| s.as_ref().is_some_and(VoteSession::can_continue_writing));
    let display = move || {
        session.with(|s| s.as_ref().map(|s| s.display().to_string()).unwrap_or_default())
    };
    let deadline = move || {
        session.with(|s| {
            s.as_ref()
                .and_then(VoteSession::deadline)
                .map(|d| format!("Closes at {}", d.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default()
        })
    };
    let cards = move || session.with(|s| s.as_ref().map(VoteSession::cards).unwrap_or_default());
    let empty = move || session.with(|s| s.as_ref().is_some_and(VoteSession::is_empty));
    let logged_in = move || auth.is_some_and(|a| a.token.get().is_some());

    let on_continue = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        match session.with_untracked(|s| s.as_ref().map(VoteSession::continue_writing_target)) {
            Some(Ok(path)) => nav::push_and_reload(&path),
            Some(Err(e)) => {
                log::error!("continue writing unavailable: {e}");
                nav::alert(&e.to_string());
            }
            None => nav::alert(&ClientError::ChapterUnresolved.to_string()),
        }
    };

    view! {
        <section class="vote-page">
            <div class="countdown-box">
                <span id="countdown-display" class="countdown-display">{display}</span>
                <span class="countdown-deadline">{deadline}</span>
            </div>
            <button
                class="btn-continue-writing"
                disabled=move || !can_continue()
                on:click=on_continue
            >
                "Continue writing"
            </button>
            <Show when=move || !logged_in()>
                <p class="vote-hint">"Log in to vote."</p>
            </Show>
            <Show when=move || loading.get()>
                <p class="vote-loading">"Loading proposals..."</p>
            </Show>
            <Show when=move || error.get().is_some()>
                <p class="vote-error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=empty>
                <p class="vote-empty">"No proposals have been submitted yet."</p>
            </Show>
            <div class="proposal-grid">
                <For
                    each=cards
                    key=|card| card.proposal.proposal_id
                    let:card
                >
                    <ProposalItem card=card selected=selected voting_open=voting_open />
                </For>
            </div>
            <VotingModal session=session selected=selected voting_open=voting_open />
        </section>
    }
}

#[component]
fn ProposalItem(
    card: ProposalCard,
    selected: RwSignal<Option<i64>>,
    voting_open: Signal<bool>,
) -> impl IntoView {
    let id = card.proposal.proposal_id;
    let class = match card.badge {
        Some(badge) => format!("proposal-item {}", badge.class()),
        None => "proposal-item".to_string(),
    };

    view! {
        <div class=class>
            <div class="proposal-rank">{card.rank}</div>
            <h4 class="proposal-title">{card.proposal.proposal_title.clone()}</h4>
            <div class="proposal-meta">
                <span class="proposal-author">{card.proposal.proposal_author.clone()}</span>
                // Unicode heart
                <span class="proposal-votes">{format!("\u{2665} {}", card.proposal.vote_count)}</span>
            </div>
            <button
                class="btn-vote"
                data-proposal-id=id.to_string()
                disabled=move || !voting_open.get()
                on:click=move |_| selected.set(Some(id))
            >
                "Vote"
            </button>
            <div class="proposal-actions">
                <button class="btn-read" on:click=move |_| selected.set(Some(id))>"Read"</button>
            </div>
        </div>
    }
}

/// Full proposal text plus the vote / withdraw actions.
#[component]
fn VotingModal(
    session: Session,
    selected: RwSignal<Option<i64>>,
    voting_open: Signal<bool>,
) -> impl IntoView {
    let close = move |_: leptos::ev::MouseEvent| selected.set(None);

    move || {
        let id = selected.get()?;
        let proposal =
            session.with_untracked(|s| s.as_ref().and_then(|s| s.proposal(id).cloned()))?;
        Some(view! {
            <div class="voting-modal-container">
                <div class="voting-modal-overlay" on:click=close></div>
                <div class="voting-modal">
                    <button class="voting-modal-close-btn" on:click=close>"\u{00D7}"</button>
                    <h3 class="voting-modal-title">"Vote for the next chapter"</h3>
                    <h4 class="voting-chapter-title">{proposal.proposal_title.clone()}</h4>
                    <p class="voting-author-name">{format!("by {}", proposal.proposal_author)}</p>
                    <p class="voting-score">{format!("Current score: {}", proposal.vote_count)}</p>
                    <div class="voting-content">{proposal.proposal_content.clone()}</div>
                    <div class="voting-actions">
                        <button
                            class="btn-vote btn-confirm-vote"
                            disabled=move || !voting_open.get()
                            on:click=move |_| do_vote(session, id)
                        >
                            "Vote"
                        </button>
                        <button
                            class="btn-withdraw-vote"
                            disabled=move || !voting_open.get()
                            on:click=move |_| withdraw_vote(session, id)
                        >
                            "Withdraw my vote"
                        </button>
                    </div>
                </div>
            </div>
        })
    }
}

// ── Actions ──

fn do_vote(session: Session, proposal_id: i64) {
    let call = session.with_untracked(|s| s.as_ref().map(|s| s.vote_call(proposal_id)));
    send_vote(call, "Your vote has been counted.");
}

fn withdraw_vote(session: Session, proposal_id: i64) {
    let call = session.with_untracked(|s| s.as_ref().map(|s| s.cancel_vote_call(proposal_id)));
    send_vote(call, "Your vote has been withdrawn.");
}

/// No optimistic update: the page reloads so the ranking reflects the
/// server's tally.
fn send_vote(call: Option<Result<ApiCall, ClientError>>, done: &'static str) {
    let call = match call {
        Some(Ok(call)) => call,
        Some(Err(e)) => {
            nav::alert(&e.to_string());
            return;
        }
        None => return,
    };
    spawn_local(async move {
        match api::send(&call).await {
            Ok(body) => {
                nav::alert(&body.message().unwrap_or_else(|| done.to_string()));
                nav::reload();
            }
            Err(e) => {
                if e.is_local() {
                    log::info!("{call:?} not sent: {e}");
                } else {
                    log::warn!("{call:?} rejected: {e}");
                }
                nav::alert(&e.to_string());
            }
        }
    });
}

// ── Countdown ──

/// Runs the first tick immediately and arms the one-second timer while the
/// round is still open. Arming replaces, and so clears, any live timer.
fn start_countdown(session: Session, timer: Timer) {
    if !matches!(tick(session, timer, false), Tick::Remaining(_)) {
        return;
    }
    let handle = Interval::new(TICK_MILLIS, move || {
        tick(session, timer, true);
    });
    if timer
        .try_update_value(|slot| slot.replace(handle))
        .unwrap_or(false)
    {
        log::debug!("previous countdown timer cleared");
    }
}

fn tick(session: Session, timer: Timer, from_timer: bool) -> Tick {
    let now = nav::now();
    let outcome = session
        .try_update(|s| s.as_mut().map_or(Tick::Idle, |s| s.tick(now)))
        .unwrap_or(Tick::Idle);
    match outcome {
        Tick::Remaining(_) => {}
        Tick::Expired => {
            stop_timer(timer, from_timer);
            log::info!("voting deadline reached");
            finalize(session);
        }
        Tick::Idle => stop_timer(timer, from_timer),
    }
    outcome
}

/// An interval cannot be dropped while its own callback runs; that case is
/// pushed to a microtask.
fn stop_timer(timer: Timer, from_timer: bool) {
    let cancel = move || {
        timer.update_value(|slot| {
            slot.cancel();
        })
    };
    if from_timer {
        spawn_local(async move { cancel() });
    } else {
        cancel();
    }
}

/// Closes the round on the server. Attempted at most once per page load;
/// failures leave the page locked until a manual reload.
fn finalize(session: Session) {
    let Some(call) = session
        .try_update(|s| s.as_mut().and_then(VoteSession::begin_finalize))
        .flatten()
    else {
        return;
    };
    spawn_local(async move {
        match api::send(&call).await {
            Ok(body) => {
                let outcome = FinalizeOutcome::from_body(&body);
                log::info!("round finalized (server redirect: {:?})", outcome.redirect_url);
                session.update(|s| {
                    if let Some(s) = s.as_mut() {
                        s.finalize_finished(true);
                    }
                });
                nav::alert(&outcome.message);
                nav::reload();
            }
            Err(e) => {
                log::error!("finalize failed: {e}");
                session.update(|s| {
                    if let Some(s) = s.as_mut() {
                        s.finalize_finished(false);
                    }
                });
                nav::alert(&format!("Could not close the vote: {e}"));
            }
        }
    });
}
