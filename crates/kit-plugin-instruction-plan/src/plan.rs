use crate::{
    compute_budget::compute_budget_instructions, InstructionPlanConfig, InstructionPlanError,
    InstructionPlanResult,
};
use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
    transaction::Transaction,
};
use tracing::debug;

/// What the caller wants executed, before it is packed into transactions
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionPlan {
    Single(Instruction),
    /// Children run in order. A divisible sequence may be split across
    /// several transactions; a non-divisible one must fit in a single transaction.
    Sequential {
        plans: Vec<InstructionPlan>,
        divisible: bool,
    },
    /// Children run in any order, possibly concurrently
    Parallel(Vec<InstructionPlan>),
}

impl InstructionPlan {
    pub fn single(instruction: Instruction) -> Self {
        InstructionPlan::Single(instruction)
    }

    pub fn sequential(plans: Vec<InstructionPlan>) -> Self {
        InstructionPlan::Sequential {
            plans,
            divisible: true,
        }
    }

    pub fn non_divisible_sequential(plans: Vec<InstructionPlan>) -> Self {
        InstructionPlan::Sequential {
            plans,
            divisible: false,
        }
    }

    pub fn parallel(plans: Vec<InstructionPlan>) -> Self {
        InstructionPlan::Parallel(plans)
    }

    /// All `instructions` in a single transaction, in order
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self::non_divisible_sequential(instructions.into_iter().map(Self::single).collect())
    }

    /// Every instruction of the plan, depth first
    pub fn instructions(&self) -> Vec<&Instruction> {
        match self {
            InstructionPlan::Single(instruction) => vec![instruction],
            InstructionPlan::Sequential { plans, .. } | InstructionPlan::Parallel(plans) => {
                plans.iter().flat_map(InstructionPlan::instructions).collect()
            }
        }
    }

    pub fn instruction_count(&self) -> usize {
        match self {
            InstructionPlan::Single(_) => 1,
            InstructionPlan::Sequential { plans, .. } | InstructionPlan::Parallel(plans) => {
                plans.iter().map(InstructionPlan::instruction_count).sum()
            }
        }
    }
}

impl From<Instruction> for InstructionPlan {
    fn from(instruction: Instruction) -> Self {
        InstructionPlan::Single(instruction)
    }
}

/// A compiled message ready to be signed and sent
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransaction {
    pub message: Message,
}

impl PlannedTransaction {
    /// Serialized size of the transaction once signed
    pub fn size(&self) -> usize {
        transaction_size(&self.message)
    }
}

/// The shape an [`InstructionPlan`] was packed into
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionPlan {
    Single(PlannedTransaction),
    Sequential(Vec<TransactionPlan>),
    Parallel(Vec<TransactionPlan>),
}

impl TransactionPlan {
    pub fn as_single(&self) -> Option<&PlannedTransaction> {
        match self {
            TransactionPlan::Single(transaction) => Some(transaction),
            _ => None,
        }
    }

    /// Every planned transaction, depth first
    pub fn transactions(&self) -> Vec<&PlannedTransaction> {
        match self {
            TransactionPlan::Single(transaction) => vec![transaction],
            TransactionPlan::Sequential(plans) | TransactionPlan::Parallel(plans) => {
                plans.iter().flat_map(TransactionPlan::transactions).collect()
            }
        }
    }

    pub fn transaction_count(&self) -> usize {
        match self {
            TransactionPlan::Single(_) => 1,
            TransactionPlan::Sequential(plans) | TransactionPlan::Parallel(plans) => {
                plans.iter().map(TransactionPlan::transaction_count).sum()
            }
        }
    }
}

/// Serialized size of a transaction carrying `message` and all of its signatures.
///
/// A message that cannot be serialized counts as too large for any transaction.
pub fn transaction_size(message: &Message) -> usize {
    bincode::serialized_size(&Transaction::new_unsigned(message.clone()))
        .map_or(usize::MAX, |size| size as usize)
}

/// Packs instruction plans into transaction plans for one fee payer.
///
/// Every message starts with a provisory `SetComputeUnitLimit` instruction,
/// followed by `SetComputeUnitPrice` when a priority fee is configured.
#[derive(Debug, Clone)]
pub struct TransactionPlanner {
    payer: Pubkey,
    config: InstructionPlanConfig,
}

impl TransactionPlanner {
    pub fn new(payer: Pubkey) -> Self {
        Self {
            payer,
            config: InstructionPlanConfig::default(),
        }
    }

    pub fn with_config(payer: Pubkey, config: InstructionPlanConfig) -> Self {
        Self { payer, config }
    }

    pub fn payer(&self) -> Pubkey {
        self.payer
    }

    pub fn config(&self) -> &InstructionPlanConfig {
        &self.config
    }

    /// Pack `plan` into messages referencing `recent_blockhash`
    pub fn plan(
        &self,
        plan: &InstructionPlan,
        recent_blockhash: Hash,
    ) -> InstructionPlanResult<TransactionPlan> {
        if plan.instruction_count() == 0 {
            return Err(InstructionPlanError::NoInstructions);
        }

        let transaction_plan = self
            .plan_node(plan, &recent_blockhash)?
            .ok_or(InstructionPlanError::NoInstructions)?;

        debug!(
            "Planned {} instructions into {} transactions",
            plan.instruction_count(),
            transaction_plan.transaction_count()
        );
        Ok(transaction_plan)
    }

    fn plan_node(
        &self,
        plan: &InstructionPlan,
        recent_blockhash: &Hash,
    ) -> InstructionPlanResult<Option<TransactionPlan>> {
        match plan {
            InstructionPlan::Sequential {
                plans,
                divisible: true,
            } => {
                let mut steps = Vec::new();
                let mut pending = Vec::new();
                self.pack_divisible(plans, recent_blockhash, &mut pending, &mut steps)?;
                self.flush(&mut pending, recent_blockhash, &mut steps)?;

                Ok(match steps.len() {
                    0 => None,
                    1 => steps.pop(),
                    _ => Some(TransactionPlan::Sequential(steps)),
                })
            }
            InstructionPlan::Parallel(plans) => {
                let mut children = Vec::with_capacity(plans.len());
                for child in plans {
                    if let Some(planned) = self.plan_node(child, recent_blockhash)? {
                        children.push(planned);
                    }
                }
                Ok((!children.is_empty()).then_some(TransactionPlan::Parallel(children)))
            }
            atomic => {
                let instructions: Vec<Instruction> =
                    atomic.instructions().into_iter().cloned().collect();
                if instructions.is_empty() {
                    return Ok(None);
                }
                let message = self.compile(&instructions, recent_blockhash)?;
                Ok(Some(TransactionPlan::Single(PlannedTransaction { message })))
            }
        }
    }

    fn pack_divisible(
        &self,
        plans: &[InstructionPlan],
        recent_blockhash: &Hash,
        pending: &mut Vec<Instruction>,
        steps: &mut Vec<TransactionPlan>,
    ) -> InstructionPlanResult<()> {
        for plan in plans {
            match plan {
                InstructionPlan::Sequential {
                    plans,
                    divisible: true,
                } => self.pack_divisible(plans, recent_blockhash, pending, steps)?,
                InstructionPlan::Parallel(_) => {
                    self.flush(pending, recent_blockhash, steps)?;
                    if let Some(step) = self.plan_node(plan, recent_blockhash)? {
                        steps.push(step);
                    }
                }
                atomic => {
                    let group: Vec<Instruction> =
                        atomic.instructions().into_iter().cloned().collect();
                    if group.is_empty() {
                        continue;
                    }

                    let mut candidate = pending.clone();
                    candidate.extend(group.iter().cloned());
                    if self.compile(&candidate, recent_blockhash).is_ok() {
                        *pending = candidate;
                    } else {
                        self.flush(pending, recent_blockhash, steps)?;
                        // A group that does not fit on its own can never be sent
                        self.compile(&group, recent_blockhash)?;
                        *pending = group;
                    }
                }
            }
        }
        Ok(())
    }

    fn flush(
        &self,
        pending: &mut Vec<Instruction>,
        recent_blockhash: &Hash,
        steps: &mut Vec<TransactionPlan>,
    ) -> InstructionPlanResult<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let message = self.compile(pending, recent_blockhash)?;
        steps.push(TransactionPlan::Single(PlannedTransaction { message }));
        pending.clear();
        Ok(())
    }

    fn compile(
        &self,
        instructions: &[Instruction],
        recent_blockhash: &Hash,
    ) -> InstructionPlanResult<Message> {
        let mut all = compute_budget_instructions(self.config.compute_unit_price);
        all.extend_from_slice(instructions);

        let message = Message::new_with_blockhash(&all, Some(&self.payer), recent_blockhash);
        let size = transaction_size(&message);

        if instructions.len() > self.config.max_instructions_per_tx
            || size > self.config.max_transaction_size_bytes
        {
            return Err(InstructionPlanError::TransactionTooLarge {
                size,
                instructions: instructions.len(),
                max_size: self.config.max_transaction_size_bytes,
                max_instructions: self.config.max_instructions_per_tx,
            });
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_budget::{compute_unit_limit, is_compute_budget_instruction};
    use std::str::FromStr;

    fn memo(text: &str) -> Instruction {
        let program_id = Pubkey::from_str("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr").unwrap();
        Instruction::new_with_bytes(program_id, text.as_bytes(), vec![])
    }

    fn memos(count: usize) -> Vec<InstructionPlan> {
        (0..count)
            .map(|i| InstructionPlan::single(memo(&format!("memo {i}"))))
            .collect()
    }

    fn planner() -> TransactionPlanner {
        TransactionPlanner::new(Pubkey::new_unique())
    }

    #[test]
    fn test_single_plan_gets_placeholder_first() {
        let planner = planner();
        let blockhash = Hash::new_unique();

        let plan = planner
            .plan(&InstructionPlan::single(memo("hello")), blockhash)
            .unwrap();

        let message = &plan.as_single().unwrap().message;
        assert_eq!(message.instructions.len(), 2);
        assert!(is_compute_budget_instruction(message, 0));
        assert_eq!(compute_unit_limit(message), Some(0));
        assert_eq!(message.account_keys[0], planner.payer());
        assert_eq!(message.recent_blockhash, blockhash);
    }

    #[test]
    fn test_compute_unit_price_is_planned_after_limit() {
        let planner = TransactionPlanner::with_config(
            Pubkey::new_unique(),
            InstructionPlanConfig {
                compute_unit_price: Some(10),
                ..Default::default()
            },
        );

        let plan = planner
            .plan(&InstructionPlan::single(memo("hello")), Hash::default())
            .unwrap();

        let message = &plan.as_single().unwrap().message;
        assert_eq!(message.instructions.len(), 3);
        assert!(is_compute_budget_instruction(message, 0));
        assert!(is_compute_budget_instruction(message, 1));
        assert!(!is_compute_budget_instruction(message, 2));
    }

    #[test]
    fn test_empty_plans_are_rejected() {
        let result = planner().plan(&InstructionPlan::sequential(vec![]), Hash::default());
        assert!(matches!(result, Err(InstructionPlanError::NoInstructions)));

        let nested = InstructionPlan::parallel(vec![InstructionPlan::sequential(vec![])]);
        let result = planner().plan(&nested, Hash::default());
        assert!(matches!(result, Err(InstructionPlanError::NoInstructions)));
    }

    #[test]
    fn test_divisible_sequence_respects_instruction_limit() {
        let planner = TransactionPlanner::with_config(
            Pubkey::new_unique(),
            InstructionPlanConfig {
                max_instructions_per_tx: 2,
                ..Default::default()
            },
        );

        let plan = planner
            .plan(&InstructionPlan::sequential(memos(5)), Hash::default())
            .unwrap();

        let TransactionPlan::Sequential(steps) = &plan else {
            panic!("expected a sequential plan, got {plan:?}");
        };
        let sizes: Vec<usize> = steps
            .iter()
            .map(|step| step.as_single().unwrap().message.instructions.len())
            .collect();
        assert_eq!(sizes, vec![3, 3, 2]);
    }

    #[test]
    fn test_non_divisible_sequence_must_fit() {
        let planner = TransactionPlanner::with_config(
            Pubkey::new_unique(),
            InstructionPlanConfig {
                max_instructions_per_tx: 2,
                ..Default::default()
            },
        );

        let result = planner.plan(
            &InstructionPlan::non_divisible_sequential(memos(3)),
            Hash::default(),
        );

        assert!(matches!(
            result,
            Err(InstructionPlanError::TransactionTooLarge {
                instructions: 3,
                max_instructions: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_divisible_sequence_splits_on_size() {
        let big = "x".repeat(700);
        let plans = vec![
            InstructionPlan::single(memo(&big)),
            InstructionPlan::single(memo(&big)),
        ];

        let plan = planner()
            .plan(&InstructionPlan::sequential(plans.clone()), Hash::default())
            .unwrap();
        assert_eq!(plan.transaction_count(), 2);
        for transaction in plan.transactions() {
            assert!(transaction.size() <= crate::MAX_TRANSACTION_SIZE_BYTES);
        }

        let result = planner().plan(
            &InstructionPlan::non_divisible_sequential(plans),
            Hash::default(),
        );
        assert!(matches!(
            result,
            Err(InstructionPlanError::TransactionTooLarge { .. })
        ));
    }

    #[test]
    fn test_atomic_groups_are_kept_together() {
        let planner = TransactionPlanner::with_config(
            Pubkey::new_unique(),
            InstructionPlanConfig {
                max_instructions_per_tx: 3,
                ..Default::default()
            },
        );
        let plan = InstructionPlan::sequential(vec![
            InstructionPlan::single(memo("a")),
            InstructionPlan::single(memo("b")),
            InstructionPlan::non_divisible_sequential(vec![
                InstructionPlan::single(memo("c")),
                InstructionPlan::single(memo("d")),
            ]),
        ]);

        let plan = planner.plan(&plan, Hash::default()).unwrap();

        let counts: Vec<usize> = plan
            .transactions()
            .iter()
            .map(|transaction| transaction.message.instructions.len() - 1)
            .collect();
        assert_eq!(counts, vec![2, 2]);
    }

    #[test]
    fn test_parallel_plan_keeps_its_shape() {
        let plan = planner()
            .plan(&InstructionPlan::parallel(memos(3)), Hash::default())
            .unwrap();

        let TransactionPlan::Parallel(children) = &plan else {
            panic!("expected a parallel plan, got {plan:?}");
        };
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|child| child.as_single().is_some()));
    }

    #[test]
    fn test_parallel_inside_sequence_splits_the_sequence() {
        let plan = InstructionPlan::sequential(vec![
            InstructionPlan::single(memo("before")),
            InstructionPlan::parallel(memos(2)),
            InstructionPlan::single(memo("after")),
        ]);

        let plan = planner().plan(&plan, Hash::default()).unwrap();

        let TransactionPlan::Sequential(steps) = &plan else {
            panic!("expected a sequential plan, got {plan:?}");
        };
        assert_eq!(steps.len(), 3);
        assert!(matches!(steps[0], TransactionPlan::Single(_)));
        assert!(matches!(steps[1], TransactionPlan::Parallel(_)));
        assert!(matches!(steps[2], TransactionPlan::Single(_)));
        assert_eq!(plan.transaction_count(), 4);
    }

    #[test]
    fn test_from_instructions_is_one_transaction() {
        let plan = InstructionPlan::from_instructions(vec![memo("a"), memo("b")]);
        assert_eq!(plan.instruction_count(), 2);

        let planned = planner().plan(&plan, Hash::default()).unwrap();
        assert_eq!(planned.as_single().unwrap().message.instructions.len(), 3);
    }

    #[test]
    fn test_transaction_size_matches_signed_wire_size() {
        use solana_sdk::{signature::Keypair, signer::Signer, system_instruction};

        let payer = Keypair::new();
        let message = Message::new(
            &[system_instruction::transfer(
                &payer.pubkey(),
                &Pubkey::new_unique(),
                1,
            )],
            Some(&payer.pubkey()),
        );
        let signed = Transaction::new(&[&payer], message.clone(), Hash::default());

        assert_eq!(
            transaction_size(&message),
            bincode::serialize(&signed).unwrap().len()
        );
    }
}
