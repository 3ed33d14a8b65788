//! Read-only projections of the room used by the HTTP layer.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use super::Room;
use crate::domain::shift::RakeCollection;
use crate::domain::{
    Denomination, Location, Money, MovementReason, PersonId, PlayerSeat, SessionId, SessionState,
    Shift, ShiftId, TableId, TableSession,
};
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenominationView {
    pub id: i64,
    #[serde(rename = "valor")]
    pub face_value: Money,
    pub color: Option<String>,
    #[serde(rename = "cantidad_boveda")]
    pub qty_vault: u64,
    #[serde(rename = "cantidad_caja")]
    pub qty_cash: u64,
    #[serde(rename = "cantidad_circulacion")]
    pub qty_circulation: u64,
    #[serde(rename = "cantidad_total")]
    pub qty_total: u64,
    #[serde(rename = "valor_boveda")]
    pub value_vault: Money,
    #[serde(rename = "valor_caja")]
    pub value_cash: Money,
    #[serde(rename = "valor_circulacion")]
    pub value_circulation: Money,
    #[serde(rename = "valor_total")]
    pub value_total: Money,
}

impl From<&Denomination> for DenominationView {
    fn from(d: &Denomination) -> Self {
        Self {
            id: d.id,
            face_value: d.face_value,
            color: d.color.clone(),
            qty_vault: d.qty(Location::Vault),
            qty_cash: d.qty(Location::Cash),
            qty_circulation: d.qty(Location::Circulation),
            qty_total: d.qty_total(),
            value_vault: d.value_at(Location::Vault),
            value_cash: d.value_at(Location::Cash),
            value_circulation: d.value_at(Location::Circulation),
            value_total: d.value_total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryView {
    #[serde(rename = "detalle")]
    pub denominations: Vec<DenominationView>,
    #[serde(rename = "valor_boveda")]
    pub value_vault: Money,
    #[serde(rename = "valor_caja")]
    pub value_cash: Money,
    #[serde(rename = "valor_circulacion")]
    pub value_circulation: Money,
    #[serde(rename = "valor_total")]
    pub value_total: Money,
    #[serde(rename = "unidades_total")]
    pub units_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPreview {
    #[serde(rename = "puede_abrir")]
    pub can_open: bool,
    #[serde(rename = "hay_turno_activo")]
    pub has_active_shift: bool,
    #[serde(rename = "fichas")]
    pub chips: InventoryView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashAlert {
    #[serde(rename = "valor_caja")]
    pub value_cash: Money,
    #[serde(rename = "valor_total")]
    pub value_total: Money,
    #[serde(rename = "porcentaje_caja")]
    pub cash_ratio: Money,
    #[serde(rename = "umbral")]
    pub threshold: Money,
    #[serde(rename = "alerta_caja_baja")]
    pub low_cash: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveShiftView {
    #[serde(rename = "hay_turno_activo")]
    pub has_active_shift: bool,
    #[serde(rename = "turno", skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(rename = "sesiones_activas", skip_serializing_if = "Option::is_none")]
    pub active_sessions: Option<usize>,
    #[serde(rename = "valor_fichas_caja", skip_serializing_if = "Option::is_none")]
    pub cash_chip_value: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSessionView {
    pub session_id: SessionId,
    pub table_id: TableId,
    #[serde(rename = "numero_mesa")]
    pub table_number: Option<u32>,
    #[serde(rename = "nombre_mesa")]
    pub table_name: Option<String>,
    #[serde(rename = "stakes")]
    pub stakes: String,
    #[serde(rename = "inicio", with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(rename = "estado")]
    pub state: SessionState,
    #[serde(rename = "jugadores_sentados")]
    pub seated_players: usize,
    pub dealer_id: Option<PersonId>,
    pub rake: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatView {
    #[serde(flatten)]
    pub seat: PlayerSeat,
    #[serde(rename = "resultado")]
    pub result: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDetail {
    #[serde(rename = "sesion")]
    pub session: TableSession,
    #[serde(rename = "jugadores")]
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealerView {
    pub dealer_id: PersonId,
    /// Listed on the shift roster.
    #[serde(rename = "en_turno")]
    pub on_roster: bool,
    pub session_id: Option<SessionId>,
    pub table_id: Option<TableId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShiftStatistics {
    pub shift_id: ShiftId,
    #[serde(rename = "movimientos_por_tipo")]
    pub movements_by_reason: BTreeMap<&'static str, usize>,
    #[serde(rename = "sesiones_abiertas")]
    pub sessions_opened: usize,
    #[serde(rename = "jugadores_sentados")]
    pub players_seated: usize,
    #[serde(rename = "total_buy_ins")]
    pub total_buy_ins: Money,
    #[serde(rename = "total_cashouts")]
    pub total_cash_outs: Money,
    #[serde(rename = "rake_por_mesa")]
    pub rake_by_table: BTreeMap<TableId, Money>,
    #[serde(rename = "rake_por_dealer")]
    pub rake_by_dealer: BTreeMap<PersonId, Money>,
}

impl Room {
    pub fn inventory(&self) -> InventoryView {
        let ledger = self.ledger();
        InventoryView {
            denominations: ledger.iter().map(DenominationView::from).collect(),
            value_vault: ledger.value(Location::Vault),
            value_cash: ledger.value(Location::Cash),
            value_circulation: ledger.value(Location::Circulation),
            value_total: ledger.total_value(),
            units_total: ledger.total_units(),
        }
    }

    pub fn preview_open(&self) -> OpenPreview {
        let has_active_shift = self.open_shift.is_some();
        OpenPreview {
            can_open: !has_active_shift && !self.ledger().is_empty(),
            has_active_shift,
            chips: self.inventory(),
        }
    }

    pub fn cash_alert(&self) -> CashAlert {
        let ledger = self.ledger();
        let value_cash = ledger.value(Location::Cash);
        let value_total = ledger.total_value();
        let cash_ratio = if value_total.is_zero() {
            Money::ZERO
        } else {
            value_cash / value_total
        };
        CashAlert {
            value_cash,
            value_total,
            cash_ratio,
            threshold: self.policy.low_cash_ratio,
            low_cash: !ledger.is_empty() && cash_ratio < self.policy.low_cash_ratio,
        }
    }

    pub fn active_shift_view(&self) -> ActiveShiftView {
        match self.active_shift() {
            Ok(shift) => ActiveShiftView {
                has_active_shift: true,
                shift: Some(shift.clone()),
                active_sessions: Some(self.active_sessions().count()),
                cash_chip_value: Some(self.ledger().value(Location::Cash)),
            },
            Err(_) => ActiveShiftView {
                has_active_shift: false,
                shift: None,
                active_sessions: None,
                cash_chip_value: None,
            },
        }
    }

    pub fn active_session_views(&self) -> Vec<ActiveSessionView> {
        self.active_sessions()
            .map(|session| {
                let table = self.tables.get(&session.table_id);
                ActiveSessionView {
                    session_id: session.id,
                    table_id: session.table_id,
                    table_number: table.map(|t| t.number),
                    table_name: table.map(|t| t.name.clone()),
                    stakes: session.stakes.clone(),
                    started_at: session.started_at,
                    state: session.state,
                    seated_players: session
                        .seat_ids
                        .iter()
                        .filter_map(|id| self.seats.get(id))
                        .filter(|s| s.is_open())
                        .count(),
                    dealer_id: session.current_dealer(),
                    rake: session.rake,
                }
            })
            .collect()
    }

    pub fn session_detail(&self, session_id: SessionId) -> Result<SessionDetail, DomainError> {
        let session = self.require_session(session_id)?;
        let seats = session
            .seat_ids
            .iter()
            .filter_map(|id| self.seats.get(id))
            .map(|seat| SeatView {
                seat: seat.clone(),
                result: seat.result(),
            })
            .collect();
        Ok(SessionDetail {
            session: session.clone(),
            seats,
        })
    }

    /// Roster dealers plus anyone dealing at an active session.
    pub fn dealers(&self) -> Result<Vec<DealerView>, DomainError> {
        let shift = self.active_shift()?;
        let mut by_dealer: BTreeMap<PersonId, DealerView> = shift
            .dealer_ids
            .iter()
            .map(|&dealer_id| {
                (
                    dealer_id,
                    DealerView {
                        dealer_id,
                        on_roster: true,
                        session_id: None,
                        table_id: None,
                    },
                )
            })
            .collect();

        for session in self.active_sessions() {
            if let Some(dealer_id) = session.current_dealer() {
                let view = by_dealer.entry(dealer_id).or_insert(DealerView {
                    dealer_id,
                    on_roster: false,
                    session_id: None,
                    table_id: None,
                });
                view.session_id = Some(session.id);
                view.table_id = Some(session.table_id);
            }
        }
        Ok(by_dealer.into_values().collect())
    }

    pub fn active_rakes(&self) -> Result<Vec<RakeCollection>, DomainError> {
        let shift_id = self.active_shift()?.id;
        Ok(self
            .rakes
            .iter()
            .filter(|r| r.shift_id == shift_id)
            .cloned()
            .collect())
    }

    pub fn statistics(&self, shift_id: ShiftId) -> Result<ShiftStatistics, DomainError> {
        if !self.shifts.contains_key(&shift_id) {
            return Err(DomainError::not_found(
                NotFoundKind::Shift,
                format!("shift {shift_id}"),
            ));
        }

        let mut stats = ShiftStatistics {
            shift_id,
            ..ShiftStatistics::default()
        };
        for reason in MovementReason::ALL {
            stats.movements_by_reason.insert(reason.as_str(), 0);
        }
        for movement in self.engine.movements_for_shift(shift_id) {
            *stats
                .movements_by_reason
                .entry(movement.reason.as_str())
                .or_insert(0) += 1;
            match movement.reason {
                MovementReason::BuyIn | MovementReason::Rebuy => {
                    stats.total_buy_ins += movement.total;
                }
                MovementReason::CashOut => stats.total_cash_outs += movement.total,
                _ => {}
            }
        }

        let sessions: Vec<&TableSession> = self
            .sessions
            .values()
            .filter(|s| s.shift_id == shift_id)
            .collect();
        stats.sessions_opened = sessions.len();
        stats.players_seated = sessions.iter().map(|s| s.seat_ids.len()).sum();

        for rake in self.rakes.iter().filter(|r| r.shift_id == shift_id) {
            *stats.rake_by_table.entry(rake.table_id).or_default() += rake.amount;
            if let Some(dealer_id) = rake.dealer_id {
                *stats.rake_by_dealer.entry(dealer_id).or_default() += rake.amount;
            }
        }
        Ok(stats)
    }

    /// Closed shifts with their close records, most recent first.
    pub fn closed_shifts(&self) -> Vec<&Shift> {
        self.shifts
            .values()
            .rev()
            .filter(|s| s.close.is_some())
            .collect()
    }
}
