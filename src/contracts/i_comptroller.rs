use ethers::prelude::*;

abigen!(
    IComptroller,
    r#"[
        function getAllMarkets() external view returns (address[])
    ]"#
);

abigen!(
    CToken,
    r#"[
        function underlying() external view returns (address)
    ]"#
);
