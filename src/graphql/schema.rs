use async_graphql::{EmptySubscription, Schema};

use crate::graphql::context::GraphQLContext;
use crate::graphql::mutations::Mutation;
use crate::graphql::queries::Query;

pub type GraphQLSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn build_schema(context: GraphQLContext) -> GraphQLSchema {
    Schema::build(Query, Mutation::default(), EmptySubscription)
        .data(context)
        .finish()
}

/// GraphQL SDL for the full schema; needs no database.
pub fn sdl() -> String {
    Schema::build(Query, Mutation::default(), EmptySubscription)
        .finish()
        .sdl()
}
