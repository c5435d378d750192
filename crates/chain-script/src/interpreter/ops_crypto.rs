//! Hashing and signature operations.
//!
//! Signatures are DER-encoded ECDSA over secp256k1 and always commit to
//! the transaction signature hash supplied by the context. There is no
//! sighash-type byte and no script-code rewriting.

use chain_primitives::ec::{PublicKey, Signature};
use chain_primitives::hash;

use super::error::{InterpreterError, InterpreterErrorCode};
use super::parsed_opcode::ParsedOpcode;
use super::thread::Thread;

#[derive(Debug, Clone, Copy)]
pub(crate) enum HashType {
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
}

/// Check one signature against one key. Malformed encodings never verify.
fn verify_one(sig_hash: &[u8], sig: &[u8], pub_key: &[u8]) -> bool {
    if sig.is_empty() {
        return false;
    }
    let (sig, key) = match (Signature::from_der(sig), PublicKey::from_bytes(pub_key)) {
        (Ok(s), Ok(k)) => (s, k),
        _ => return false,
    };
    key.verify(sig_hash, &sig)
}

impl<'a> Thread<'a> {
    pub(crate) fn op_hash(&mut self, hash_type: HashType) -> Result<(), InterpreterError> {
        let data = self.dstack.pop()?;
        let digest = match hash_type {
            HashType::Ripemd160 => hash::ripemd160(&data).to_vec(),
            HashType::Sha1 => hash::sha1(&data).to_vec(),
            HashType::Sha256 => hash::sha256(&data).to_vec(),
            HashType::Hash160 => hash::hash160(&data).to_vec(),
            HashType::Hash256 => hash::sha256d(&data).to_vec(),
        };
        self.dstack.push(digest);
        Ok(())
    }

    /// OP_CHECKSIG: `sig pubkey -> bool`.
    pub(crate) fn op_checksig(&mut self) -> Result<(), InterpreterError> {
        let pub_key = self.dstack.pop()?;
        let sig = self.dstack.pop()?;
        // An empty signature is a clean "false" and needs no context.
        let ok = !sig.is_empty() && {
            let sig_hash = self.context("OP_CHECKSIG")?.tx_sig_hash();
            verify_one(sig_hash.as_bytes(), &sig, &pub_key)
        };
        self.dstack.push_bool(ok);
        Ok(())
    }

    pub(crate) fn op_checksigverify(&mut self, pop: &ParsedOpcode) -> Result<(), InterpreterError> {
        self.op_checksig()?;
        self.abstract_verify(pop, InterpreterErrorCode::CheckSigVerify)
    }

    /// Pop a count `n` no larger than `max`, then the `n` items beneath it,
    /// returned deepest first.
    fn pop_group(
        &mut self,
        max: usize,
        code: InterpreterErrorCode,
        what: &str,
    ) -> Result<Vec<Vec<u8>>, InterpreterError> {
        let n = self.dstack.pop_num()?;
        let count = usize::try_from(n.clamp_i64())
            .ok()
            .filter(|c| *c <= max)
            .ok_or_else(|| {
                InterpreterError::new(code, format!("{} count {} is not in 0..={}", what, n, max))
            })?;
        let mut items = (0..count)
            .map(|_| self.dstack.pop())
            .collect::<Result<Vec<_>, _>>()?;
        items.reverse();
        Ok(items)
    }

    /// OP_CHECKMULTISIG: `sig_1 .. sig_m m pub_1 .. pub_n n -> bool`.
    ///
    /// Signatures must appear in the same order as their keys. Unlike
    /// Bitcoin there is no extra dummy element below the signatures.
    pub(crate) fn op_checkmultisig(&mut self) -> Result<(), InterpreterError> {
        let pub_keys = self.pop_group(
            self.cfg.max_pub_keys_per_multisig,
            InterpreterErrorCode::InvalidPubKeyCount,
            "pubkey",
        )?;
        self.count_ops(pub_keys.len())?;
        let signatures = self.pop_group(
            pub_keys.len(),
            InterpreterErrorCode::InvalidSignatureCount,
            "signature",
        )?;

        if signatures.is_empty() {
            self.dstack.push_bool(true);
            return Ok(());
        }
        let sig_hash = self.context("OP_CHECKMULTISIG")?.tx_sig_hash();

        // Each signature must match a key after the one the previous
        // signature matched.
        let mut keys = pub_keys.iter();
        let ok = signatures
            .iter()
            .all(|sig| keys.any(|pk| verify_one(sig_hash.as_bytes(), sig, pk)));
        self.dstack.push_bool(ok);
        Ok(())
    }

    pub(crate) fn op_checkmultisigverify(
        &mut self,
        pop: &ParsedOpcode,
    ) -> Result<(), InterpreterError> {
        self.op_checkmultisig()?;
        self.abstract_verify(pop, InterpreterErrorCode::CheckMultiSigVerify)
    }
}
