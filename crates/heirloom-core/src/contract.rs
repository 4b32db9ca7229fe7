//! Circuit descriptors for the inheritance contract artifact.
//!
//! The artifact exposes exactly two callable circuits. This module knows
//! their identifiers and argument shapes and assembles the unproven call
//! payloads the wallet balances, proves, and submits.

use heirloom_abstraction::{ContractAddress, UnprovenTransaction};

use crate::address::Address;

/// Circuits exposed by the inheritance contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Circuit {
    /// `register(parent_addr, child_addr)` - records the inheritance pair.
    Register,
    /// `execute()` - transfers control to the registered child.
    Execute,
}

impl Circuit {
    /// Circuit identifier as the artifact names it.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::Execute => "execute",
        }
    }
}

/// A call against one of the contract's circuits, with encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitCall {
    circuit: Circuit,
    args: Vec<String>,
}

impl CircuitCall {
    /// Builds a `register` call for the given inheritance pair.
    #[must_use]
    pub fn register(parent: Address, child: Address) -> Self {
        Self {
            circuit: Circuit::Register,
            args: vec![parent.to_hex(), child.to_hex()],
        }
    }

    /// Builds an `execute` call. Takes no arguments; the contract itself
    /// decides whether execution is currently valid.
    #[must_use]
    pub fn execute() -> Self {
        Self { circuit: Circuit::Execute, args: Vec::new() }
    }

    /// The circuit this call targets.
    #[must_use]
    pub fn circuit(&self) -> Circuit {
        self.circuit
    }

    /// Assembles the unproven transaction payload for the wallet.
    #[must_use]
    pub fn into_unproven(
        self,
        contract_address: &ContractAddress,
        proof_artifact_path: &str,
    ) -> UnprovenTransaction {
        UnprovenTransaction {
            contract_address: contract_address.clone(),
            circuit_id: self.circuit.id().to_string(),
            args: self.args,
            proof_artifact_path: proof_artifact_path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_call_carries_both_addresses() {
        let parent = Address::from_hex(&"11".repeat(32)).unwrap();
        let child = Address::from_hex(&"22".repeat(32)).unwrap();
        let call = CircuitCall::register(parent, child);
        assert_eq!(call.circuit(), Circuit::Register);

        let tx = call.into_unproven(&ContractAddress::from("0200ab"), "/zk/inheritance");
        assert_eq!(tx.circuit_id, "register");
        assert_eq!(tx.args, vec!["11".repeat(32), "22".repeat(32)]);
        assert_eq!(tx.proof_artifact_path, "/zk/inheritance");
    }

    #[test]
    fn test_execute_call_has_no_args() {
        let tx = CircuitCall::execute().into_unproven(&ContractAddress::from("0200ab"), "/zk");
        assert_eq!(tx.circuit_id, "execute");
        assert!(tx.args.is_empty());
    }
}
