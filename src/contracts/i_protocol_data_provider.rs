use ethers::prelude::*;

// getAllReservesTokens returns an array of (symbol, tokenAddress) structs, so
// the binding comes from the JSON ABI; the human-readable form cannot express
// a named tuple array.
abigen!(
    IProtocolDataProvider,
    r#"[
        {
            "inputs": [],
            "name": "getAllReservesTokens",
            "outputs": [
                {
                    "components": [
                        { "internalType": "string", "name": "symbol", "type": "string" },
                        { "internalType": "address", "name": "tokenAddress", "type": "address" }
                    ],
                    "internalType": "struct IProtocolDataProvider.TokenData[]",
                    "name": "",
                    "type": "tuple[]"
                }
            ],
            "stateMutability": "view",
            "type": "function"
        },
        {
            "inputs": [
                { "internalType": "address", "name": "asset", "type": "address" }
            ],
            "name": "getReserveTokensAddresses",
            "outputs": [
                { "internalType": "address", "name": "aTokenAddress", "type": "address" },
                { "internalType": "address", "name": "stableDebtTokenAddress", "type": "address" },
                { "internalType": "address", "name": "variableDebtTokenAddress", "type": "address" }
            ],
            "stateMutability": "view",
            "type": "function"
        }
    ]"#
);
