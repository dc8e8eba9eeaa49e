//! Turn transitions.
//!
//! Every transition takes `&self` and returns the next snapshot. A refused
//! call returns a copy that differs only by one log entry explaining why.

use super::agent::{learner_for, Agent};
use super::globals::*;
use super::learner::Action;
use super::prng::{draw_index, roll_dice};
use super::rules::{adjust_net_worth, compute_rent, group_holdings, jail_player, leave_jail, wrap};
use super::state::GameState;
use crate::error::Rejection;

impl GameState {
    /*********        PLAYER TRANSITIONS        *********/

    /// Roll the dice and move the current player.
    pub fn roll_and_advance(&self) -> GameState {
        self.try_roll_and_advance().unwrap_or_else(|e| self.absorb(e))
    }

    /// Apply the effect of the tile the current player landed on.
    pub fn resolve_landing(&self) -> GameState {
        self.try_resolve_landing().unwrap_or_else(|e| self.absorb(e))
    }

    /// Buy the tile the current player is on. AI buyers learn from the purchase.
    pub fn buy_current(&self, agents: &mut [Agent]) -> GameState {
        self.try_buy_current(agents).unwrap_or_else(|e| self.absorb(e))
    }

    /// Decline to buy the tile the current player is on.
    pub fn skip_purchase(&self) -> GameState {
        self.try_skip_purchase().unwrap_or_else(|e| self.absorb(e))
    }

    /// Improve a tile owned by the current player. This is allowed in any phase.
    pub fn build_on_owned(&self, tile: usize, agents: &mut [Agent]) -> GameState {
        self.try_build_on_owned(tile, agents)
            .unwrap_or_else(|e| self.absorb(e))
    }

    /// Mortgage a tile owned by the current player, or lift its mortgage.
    pub fn toggle_mortgage(&self, tile: usize) -> GameState {
        self.try_toggle_mortgage(tile).unwrap_or_else(|e| self.absorb(e))
    }

    /// Pass the turn to the next player still in the game.
    pub fn end_turn(&self) -> GameState {
        self.try_end_turn().unwrap_or_else(|e| self.absorb(e))
    }

    /*********        AI TRANSITIONS        *********/

    /// Play AI turns until it's a human's turn or the game is over.
    pub fn run_until_human(&self, agents: &mut [Agent]) -> GameState {
        let mut state = self.clone();

        // The bound only guards against a table with no humans left to return to
        for _ in 0..RUN_GUARD {
            let player = state.current_player();
            if state.is_over() || player.is_human || player.bankrupt {
                break;
            }

            state = state.ai_take_turn(agents);
        }

        state
    }

    /// Play the current player's whole turn on behalf of its learner.
    pub fn ai_take_turn(&self, agents: &mut [Agent]) -> GameState {
        let actor = self.turn;

        if self.players[actor].is_human {
            return self.absorb(Rejection::HumanSeat {
                player: self.players[actor].name.clone(),
            });
        }

        let mut state = self.clone();

        if state.phase == Phase::AwaitRoll {
            state = state.roll_and_advance();
        }

        if state.phase == Phase::AwaitResolve {
            state = state.resolve_landing();
        }

        if state.phase == Phase::AwaitAction {
            state = state.ai_buy_decision(agents);
        }

        state = state.ai_improve(agents);
        state.pass_turn();
        state
    }

    /*********        TRANSITION BODIES        *********/

    fn try_roll_and_advance(&self) -> Result<GameState, Rejection> {
        self.expect_phase(Phase::AwaitRoll, "rolling")?;

        let player = self.current_player();
        if player.bankrupt {
            return Err(Rejection::Bankrupt {
                player: player.name.clone(),
            });
        }

        let mut next = self.clone();

        // Get the player out of jail if they've served their time
        if player.in_jail {
            let p = next.current_player_mut();
            p.jail_turns += 1;

            if p.jail_turns >= JAIL_TURNS_BEFORE_BAIL && p.cash >= BAIL {
                p.cash -= BAIL;
                leave_jail(p);

                let line = format!("{} pays ${} to leave jail", p.name, BAIL);
                next.push_log(line);
            } else {
                let stay = Rejection::StillInJail {
                    player: p.name.clone(),
                    turns: p.jail_turns,
                };

                // Only the jail counter moves
                return Ok(next.absorb(stay));
            }
        }

        let (dice, seed) = roll_dice(next.seed);
        next.seed = seed;
        next.dice = Some(dice);

        let from = next.current_player().position;
        let to = wrap(from as i64 + dice.sum() as i64);
        let passed_go = to < from;
        let destination = next.tiles[to as usize].name;

        let p = next.current_player_mut();
        if passed_go {
            p.cash += GO_BONUS;
        }
        p.position = to;

        let line = format!(
            "{} rolls {} + {} and moves to {}{}",
            p.name,
            dice.d1,
            dice.d2,
            destination,
            if passed_go {
                format!(", collecting ${}", GO_BONUS)
            } else {
                "".to_owned()
            }
        );
        next.push_log(line);

        next.prompts = Prompts {
            landed_tile: Some(to),
            ..Prompts::default()
        };
        next.phase = Phase::AwaitResolve;
        Ok(next)
    }

    fn try_resolve_landing(&self) -> Result<GameState, Rejection> {
        self.expect_phase(Phase::AwaitResolve, "resolving a landing")?;

        let mut next = self.clone();
        let actor = next.turn;
        let tile = next.current_tile().clone();
        let name = next.players[actor].name.clone();

        next.prompts.landed_tile = Some(tile.index);

        match (tile.kind, &tile.property) {
            (kind, Some(prop)) if kind.is_ownable() => match prop.owner {
                None => {
                    next.prompts.can_buy = true;
                    next.push_log(format!("{} may buy {} for ${}", name, tile.name, prop.cost));
                }
                Some(owner) if owner == actor => {
                    next.push_log(format!("{} visits their own {}", name, tile.name));
                }
                Some(_) if prop.mortgaged => {
                    next.push_log(format!("{} is mortgaged, no rent is due", tile.name));
                }
                // Bankrupt owners are out of the game and collect nothing
                Some(owner) if next.players[owner].bankrupt => {
                    next.push_log(format!("{}'s owner is bankrupt, no rent is due", tile.name));
                }
                Some(owner) => {
                    let holdings = group_holdings(&next.tiles, owner, prop.group);
                    let rent = compute_rent(&tile, holdings);

                    next.players[actor].cash -= rent;
                    next.players[owner].cash += rent;
                    next.prompts.must_pay = Some(rent);

                    let line = format!(
                        "{} pays ${} rent to {} for {}",
                        name, rent, next.players[owner].name, tile.name
                    );
                    next.push_log(line);
                }
            },
            (TileKind::Tax, _) => {
                let amount = tile.tax.unwrap_or(0);

                next.players[actor].cash -= amount;
                next.prompts.must_pay = Some(amount);
                next.push_log(format!("{} pays ${} of {}", name, amount, tile.name));
            }
            (TileKind::Event, _) => {
                let delta = EVENT_OUTCOMES[draw_index(&mut next.seed, EVENT_OUTCOMES.len())];

                next.players[actor].cash += delta;
                if delta < 0 {
                    next.prompts.must_pay = Some(-delta);
                }
                next.push_log(format!("{} draws an event worth {:+}", name, delta));
            }
            (TileKind::Fund, _) => {
                next.players[actor].cash += FUND_BONUS;
                next.push_log(format!("{} collects ${} from the fund", name, FUND_BONUS));
            }
            (TileKind::GoToJail, _) => {
                jail_player(&mut next.players[actor]);
                next.push_log(format!("{} goes to jail", name));
            }
            // 'Go', visiting jail and parking do nothing
            _ => (),
        }

        adjust_net_worth(&mut next);

        next.phase = if next.prompts.can_buy {
            Phase::AwaitAction
        } else {
            Phase::AwaitEnd
        };

        Ok(next)
    }

    fn try_buy_current(&self, agents: &mut [Agent]) -> Result<GameState, Rejection> {
        self.expect_phase(Phase::AwaitAction, "buying")?;

        let actor = self.turn;
        let player = self.current_player();
        let tile = self.current_tile();
        let prop = tile.property.as_ref().ok_or(Rejection::NotOwnable(tile.index))?;

        let mut next = self.clone();
        next.prompts.can_buy = false;
        next.phase = Phase::AwaitEnd;

        if prop.owner.is_some() {
            next.push_log(Rejection::AlreadyOwned(tile.index).to_string());
            return Ok(next);
        }

        if player.cash < prop.cost {
            let broke = Rejection::InsufficientFunds {
                player: player.name.clone(),
                needed: prop.cost,
                cash: player.cash,
            };
            log::warn!("{}", broke);
            next.push_log(broke.to_string());
            return Ok(next);
        }

        next.players[actor].cash -= prop.cost;
        if let Some(bought) = next.tiles[tile.index as usize].property.as_mut() {
            bought.owner = Some(actor);
        }
        adjust_net_worth(&mut next);

        log::info!("{} buys {} for ${}", player.name, tile.name, prop.cost);
        next.push_log(format!("{} buys {} for ${}", player.name, tile.name, prop.cost));

        if !player.is_human {
            if let Some(learner) = learner_for(agents, actor) {
                learner.learn_buy(self, &next, tile.index, Action::Buy);
            }
        }

        Ok(next)
    }

    fn try_skip_purchase(&self) -> Result<GameState, Rejection> {
        self.expect_phase(Phase::AwaitAction, "declining a purchase")?;

        let mut next = self.clone();
        next.prompts.can_buy = false;
        next.phase = Phase::AwaitEnd;

        let line = format!(
            "{} declines to buy {}",
            next.current_player().name,
            next.current_tile().name
        );
        next.push_log(line);

        Ok(next)
    }

    fn try_build_on_owned(&self, index: usize, agents: &mut [Agent]) -> Result<GameState, Rejection> {
        let actor = self.turn;
        let player = self.current_player();
        let tile = self.tile(index)?;
        let prop = tile.property.as_ref().ok_or(Rejection::NotOwnable(tile.index))?;

        if !prop.is_owned_by(actor) {
            return Err(Rejection::NotOwner {
                player: player.name.clone(),
                tile: tile.index,
            });
        }

        if prop.level >= MAX_LEVEL {
            return Err(Rejection::FullyImproved(tile.index));
        }

        if prop.mortgaged {
            return Err(Rejection::Mortgaged(tile.index));
        }

        let required = prop.cost as f64 * BUILD_CASH_RATIO;
        if (player.cash as f64) < required {
            return Err(Rejection::InsufficientFunds {
                player: player.name.clone(),
                needed: required.ceil() as i64,
                cash: player.cash,
            });
        }

        let mut next = self.clone();
        next.players[actor].cash -= prop.cost;

        let built = next.tiles[index]
            .property
            .as_mut()
            .ok_or(Rejection::NotOwnable(tile.index))?;
        built.level += 1;
        let level = built.level;
        adjust_net_worth(&mut next);

        let line = format!(
            "{} improves {} to level {} for ${}",
            player.name, tile.name, level, prop.cost
        );
        next.push_log(line);

        if !player.is_human {
            if let Some(learner) = learner_for(agents, actor) {
                learner.learn_build(self, &next, tile.index, Action::Build);
            }
        }

        Ok(next)
    }

    fn try_toggle_mortgage(&self, index: usize) -> Result<GameState, Rejection> {
        let actor = self.turn;
        let player = self.current_player();
        let tile = self.tile(index)?;
        let prop = tile.property.as_ref().ok_or(Rejection::NotOwnable(tile.index))?;

        if !prop.is_owned_by(actor) {
            return Err(Rejection::NotOwner {
                player: player.name.clone(),
                tile: tile.index,
            });
        }

        let mut next = self.clone();

        if prop.mortgaged {
            let charge = (prop.cost as f64 * UNMORTGAGE_RATE).floor() as i64;
            if player.cash < charge {
                return Err(Rejection::InsufficientFunds {
                    player: player.name.clone(),
                    needed: charge,
                    cash: player.cash,
                });
            }

            next.players[actor].cash -= charge;
            if let Some(p) = next.tiles[index].property.as_mut() {
                p.mortgaged = false;
            }
            next.push_log(format!("{} lifts the mortgage on {} for ${}", player.name, tile.name, charge));
        } else {
            let credit = (prop.cost as f64 * MORTGAGE_RATE).floor() as i64;

            next.players[actor].cash += credit;
            if let Some(p) = next.tiles[index].property.as_mut() {
                p.mortgaged = true;
            }
            next.push_log(format!("{} mortgages {} for ${}", player.name, tile.name, credit));
        }

        adjust_net_worth(&mut next);
        Ok(next)
    }

    fn try_end_turn(&self) -> Result<GameState, Rejection> {
        self.expect_phase(Phase::AwaitEnd, "ending the turn")?;

        let mut next = self.clone();
        next.pass_turn();
        Ok(next)
    }

    /*********        HELPER FUNCTIONS        *********/

    /// Hand the turn to the next player still in the game and reset the turn's bookkeeping.
    fn pass_turn(&mut self) {
        self.turn = self.next_turn();
        self.dice = None;
        self.prompts = Prompts::default();
        self.phase = Phase::AwaitRoll;
        adjust_net_worth(self);

        let line = format!("It's {}'s turn", self.current_player().name);
        log::info!("{}", line);
        self.push_log(line);
    }

    /// Let the current player's learner decide whether to buy the tile it's on.
    fn ai_buy_decision(&self, agents: &mut [Agent]) -> GameState {
        let actor = self.turn;
        let index = self.current_player().position;
        let cost = self
            .current_tile()
            .property
            .as_ref()
            .map_or(0, |prop| prop.cost);

        let mut state = self.clone();
        let mut seed = state.seed;
        let choice = match learner_for(agents, actor) {
            Some(learner) => learner.decide_buy(&state, index, &mut seed),
            None => Action::Buy,
        };
        state.seed = seed;

        if choice == Action::Buy && state.current_player().cash >= cost {
            return state.buy_current(agents);
        }

        let declined = state.skip_purchase();
        if let Some(learner) = learner_for(agents, actor) {
            learner.learn_buy(&state, &declined, index, Action::Skip);
        }

        declined
    }

    /// Let the current player's learner improve its properties while it has cash to spare.
    fn ai_improve(&self, agents: &mut [Agent]) -> GameState {
        let actor = self.turn;
        let mut state = self.clone();

        for index in self.owned_tiles(actor) {
            let cash = state.players[actor].cash;
            if cash <= AI_BUILD_RESERVE {
                break;
            }

            let buildable = state.tiles[index as usize]
                .property
                .as_ref()
                .map_or(false, |prop| {
                    prop.level < MAX_LEVEL
                        && !prop.mortgaged
                        && cash as f64 >= prop.cost as f64 * BUILD_CASH_RATIO
                });
            if !buildable {
                continue;
            }

            let mut seed = state.seed;
            let choice = match learner_for(agents, actor) {
                Some(learner) => learner.decide_build(&state, index, &mut seed),
                None => Action::Hold,
            };
            state.seed = seed;

            if choice == Action::Build {
                state = state.build_on_owned(index as usize, agents);
            }
        }

        state
    }
}
