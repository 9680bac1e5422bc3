//! The partitioner actually used to build `corelib::ring::Ring`.

use crate::partitioner::traits::Partitioner;
use crate::token::ring_token::RingToken;
use crate::token::Token;

#[derive(Clone, Copy, Debug, Default)]
pub struct DynamoPartitioner;

impl Partitioner for DynamoPartitioner {
    type TokenType = RingToken;

    fn partition(&self, key: &[u8]) -> Self::TokenType {
        RingToken::from_bytes(key)
    }

    fn min_token(&self) -> Self::TokenType {
        RingToken::zero()
    }

    fn max_token(&self) -> Self::TokenType {
        <RingToken as Token>::max()
    }

    fn name(&self) -> &'static str {
        "DynamoPartitioner"
    }
}
