//! Page-lifetime state of one voting round.
//!
//! A `VoteSession` is rebuilt from scratch on every page load. Everything in
//! here is a pure transition; the browser layer renders what it returns.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::countdown::{self, Countdown, Phase, Tick};
use crate::request::ApiCall;
use crate::routes::proposal_create_path;
use crate::{ClientError, Proposal, VoteBoard};

/// Sorts by descending vote count. Ties keep the server order.
pub fn rank_proposals(mut proposals: Vec<Proposal>) -> Vec<Proposal> {
    proposals.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    proposals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
}

impl RankBadge {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(RankBadge::Gold),
            2 => Some(RankBadge::Silver),
            3 => Some(RankBadge::Bronze),
            _ => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            RankBadge::Gold => "rank-1",
            RankBadge::Silver => "rank-2",
            RankBadge::Bronze => "rank-3",
        }
    }
}

/// Render model for one proposal card.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalCard {
    pub rank: usize,
    pub badge: Option<RankBadge>,
    pub proposal: Proposal,
}

#[derive(Debug, Clone)]
pub struct VoteSession {
    novel_id: i64,
    proposals: Vec<Proposal>,
    index: HashMap<i64, usize>,
    latest_chapter_id: Option<i64>,
    countdown: Option<Countdown>,
}

impl VoteSession {
    pub fn from_board(novel_id: i64, board: VoteBoard) -> Self {
        let mut proposals = Vec::with_capacity(board.proposals.len());
        let mut index = HashMap::with_capacity(board.proposals.len());
        for proposal in rank_proposals(board.proposals) {
            if index.contains_key(&proposal.proposal_id) {
                log::warn!("duplicate proposal {} dropped", proposal.proposal_id);
                continue;
            }
            index.insert(proposal.proposal_id, proposals.len());
            proposals.push(proposal);
        }

        let closing_time = board.deadline_info.and_then(|d| d.closing_time);
        let countdown = match closing_time.as_deref().map(countdown::parse_closing_time) {
            Some(Ok(deadline)) => Some(Countdown::new(deadline)),
            Some(Err(e)) => {
                log::error!("novel {novel_id}: {e}; countdown not started");
                None
            }
            None => {
                log::error!("novel {novel_id}: no closing time; countdown not started");
                None
            }
        };

        Self {
            novel_id,
            proposals,
            index,
            latest_chapter_id: board.latest_chapter_id,
            countdown,
        }
    }

    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn proposal(&self, proposal_id: i64) -> Option<&Proposal> {
        self.index.get(&proposal_id).map(|&i| &self.proposals[i])
    }

    pub fn cards(&self) -> Vec<ProposalCard> {
        self.proposals
            .iter()
            .enumerate()
            .map(|(i, p)| ProposalCard {
                rank: i + 1,
                badge: RankBadge::for_rank(i + 1),
                proposal: p.clone(),
            })
            .collect()
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.countdown.as_ref().map(Countdown::phase)
    }

    pub fn display(&self) -> &str {
        self.countdown.as_ref().map_or("", Countdown::display)
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.countdown.as_ref().map(Countdown::deadline)
    }

    pub fn latest_chapter_id(&self) -> Option<i64> {
        self.latest_chapter_id
    }

    /// Prefers the id derived from the novel's chapter list over the one the
    /// proposal list carried.
    pub fn resolve_latest_chapter(&mut self, from_novel: Option<i64>) {
        if from_novel.is_some() {
            self.latest_chapter_id = from_novel;
        }
    }

    /// Votes are open unless the deadline has passed. A round with no known
    /// deadline stays open.
    pub fn voting_open(&self) -> bool {
        self.countdown.as_ref().map_or(true, Countdown::is_running)
    }

    pub fn can_continue_writing(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> Tick {
        match self.countdown.as_mut() {
            Some(c) => c.tick(now),
            None => Tick::Idle,
        }
    }

    /// Returns the finalize call the first time it is asked after expiry.
    pub fn begin_finalize(&mut self) -> Option<ApiCall> {
        let novel_id = self.novel_id;
        let c = self.countdown.as_mut()?;
        c.begin_finalize().then_some(ApiCall::Finalize { novel_id })
    }

    pub fn finalize_finished(&mut self, ok: bool) {
        if let Some(c) = self.countdown.as_mut() {
            if ok {
                c.finalize_succeeded();
            } else {
                c.finalize_failed();
            }
        }
    }

    pub fn vote_call(&self, proposal_id: i64) -> Result<ApiCall, ClientError> {
        self.check_vote_target(proposal_id)?;
        Ok(ApiCall::CastVote { proposal_id })
    }

    pub fn cancel_vote_call(&self, proposal_id: i64) -> Result<ApiCall, ClientError> {
        self.check_vote_target(proposal_id)?;
        Ok(ApiCall::CancelVote { proposal_id })
    }

    fn check_vote_target(&self, proposal_id: i64) -> Result<(), ClientError> {
        if !self.voting_open() {
            return Err(ClientError::VotingClosed);
        }
        if self.proposal(proposal_id).is_none() {
            return Err(ClientError::UnknownProposal(proposal_id));
        }
        Ok(())
    }

    /// Where "continue writing" leads.
    pub fn continue_writing_target(&self) -> Result<String, ClientError> {
        if !self.can_continue_writing() {
            return Err(ClientError::VotingClosed);
        }
        self.latest_chapter_id
            .map(proposal_create_path)
            .ok_or(ClientError::ChapterUnresolved)
    }
}
