//! Reading and rewriting the compute budget instructions of a compiled message.

use solana_sdk::{
    borsh1::try_from_slice_unchecked,
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::Instruction,
    message::Message,
};

/// Compute unit limit inserted by the planner, to be replaced by an estimate
pub const PROVISORY_COMPUTE_UNIT_LIMIT: u32 = 0;

pub use solana_compute_budget::compute_budget_limits::MAX_COMPUTE_UNIT_LIMIT;

/// Compute budget instructions that open every planned message
pub(crate) fn compute_budget_instructions(compute_unit_price: Option<u64>) -> Vec<Instruction> {
    let mut instructions = vec![ComputeBudgetInstruction::set_compute_unit_limit(
        PROVISORY_COMPUTE_UNIT_LIMIT,
    )];
    if let Some(micro_lamports) = compute_unit_price {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(
            micro_lamports,
        ));
    }
    instructions
}

/// Whether the instruction at `index` of `message` targets the compute budget program
pub fn is_compute_budget_instruction(message: &Message, index: usize) -> bool {
    message
        .instructions
        .get(index)
        .and_then(|instruction| message.account_keys.get(usize::from(instruction.program_id_index)))
        .is_some_and(|program_id| *program_id == compute_budget::id())
}

/// Index and units of the first `SetComputeUnitLimit` instruction of `message`
fn find_compute_unit_limit(message: &Message) -> Option<(usize, u32)> {
    message
        .instructions
        .iter()
        .enumerate()
        .filter(|(index, _)| is_compute_budget_instruction(message, *index))
        .find_map(|(index, instruction)| {
            match try_from_slice_unchecked::<ComputeBudgetInstruction>(&instruction.data) {
                Ok(ComputeBudgetInstruction::SetComputeUnitLimit(units)) => Some((index, units)),
                _ => None,
            }
        })
}

/// Units requested by the first `SetComputeUnitLimit` instruction of `message`
pub fn compute_unit_limit(message: &Message) -> Option<u32> {
    find_compute_unit_limit(message).map(|(_, units)| units)
}

/// Rewrite the first `SetComputeUnitLimit` instruction of `message` to request `units`.
///
/// Returns `false` when the message has no such instruction.
pub fn set_compute_unit_limit(message: &mut Message, units: u32) -> bool {
    match find_compute_unit_limit(message) {
        Some((index, _)) => {
            message.instructions[index].data =
                ComputeBudgetInstruction::set_compute_unit_limit(units).data;
            true
        }
        None => false,
    }
}
